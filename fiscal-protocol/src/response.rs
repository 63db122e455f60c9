//! Parsing of the fiscal executable's stdout
//!
//! The vendor ships several builds of the command-line tool and they
//! do not agree on an output format. For `SendFileCmd` two textual
//! shapes are known:
//!
//! ```text
//! Enviados 7 comandos            (Linux builds)
//! Retorno: 7  Error: 0           (Windows builds)
//! ```
//!
//! Matchers are tried in order; if none matches, the caller must treat
//! the response as unrecognized. There is deliberately no implicit
//! success fallback.

/// Words the executable prints on a successful invocation. Any build
/// emits at least one of them; "exitasomente" is a vendor typo that
/// ships in production binaries.
const SUCCESS_MARKERS: [&str; 3] = ["exitosa", "correctamente", "exitasomente"];

/// Typed result of a recognized `SendFileCmd` response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFileOutcome {
    /// The executable reported this many processed commands
    Processed(u64),
    /// The executable reported a vendor error code (nonzero)
    VendorError(u64),
}

/// Check whether stdout carries a generic success marker
pub fn contains_success_marker(stdout: &str) -> bool {
    SUCCESS_MARKERS.iter().any(|m| stdout.contains(m))
}

/// Try the known `SendFileCmd` response shapes in order.
///
/// Returns `None` when no shape matches; never guesses.
pub fn parse_send_file_output(stdout: &str) -> Option<SendFileOutcome> {
    const MATCHERS: [fn(&str) -> Option<SendFileOutcome>; 2] =
        [match_enviados, match_retorno_error];

    let outcome = MATCHERS.iter().find_map(|m| m(stdout));
    if outcome.is_none() {
        tracing::debug!(stdout, "no known response shape matched");
    }
    outcome
}

/// Shape: `Enviados <n> comandos`
fn match_enviados(stdout: &str) -> Option<SendFileOutcome> {
    let n = number_after(stdout, "Enviados")?;
    stdout.contains("comandos").then_some(SendFileOutcome::Processed(n))
}

/// Shape: `Retorno: <n>` with `Error: <m>`
fn match_retorno_error(stdout: &str) -> Option<SendFileOutcome> {
    let retorno = number_after(stdout, "Retorno")?;
    let error = number_after(stdout, "Error")?;
    if error != 0 {
        Some(SendFileOutcome::VendorError(error))
    } else {
        Some(SendFileOutcome::Processed(retorno))
    }
}

/// First integer following `token`, skipping separating `:` and blanks
fn number_after(text: &str, token: &str) -> Option<u64> {
    let rest = &text[text.find(token)? + token.len()..];
    let rest = rest.trim_start_matches([':', ' ', '\t']);
    let digits: &str = &rest[..rest.chars().take_while(|c| c.is_ascii_digit()).count()];
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_shape() {
        assert_eq!(
            parse_send_file_output("Enviados 5 comandos exitosamente"),
            Some(SendFileOutcome::Processed(5))
        );
    }

    #[test]
    fn test_windows_shape_ok() {
        assert_eq!(
            parse_send_file_output("Comando ejecutado exitasomente. Retorno: 7, Error: 0"),
            Some(SendFileOutcome::Processed(7))
        );
    }

    #[test]
    fn test_windows_shape_vendor_error() {
        assert_eq!(
            parse_send_file_output("Retorno: 3, Error: 128"),
            Some(SendFileOutcome::VendorError(128))
        );
    }

    #[test]
    fn test_linux_shape_wins_over_windows_tokens() {
        // Some builds echo both; the first matcher decides
        assert_eq!(
            parse_send_file_output("Enviados 4 comandos. Retorno: 0, Error: 0"),
            Some(SendFileOutcome::Processed(4))
        );
    }

    #[test]
    fn test_unrecognized_is_none() {
        assert_eq!(parse_send_file_output("OK"), None);
        assert_eq!(parse_send_file_output(""), None);
        // token without a number does not match
        assert_eq!(parse_send_file_output("Enviados ??? comandos"), None);
    }

    #[test]
    fn test_zero_processed() {
        assert_eq!(
            parse_send_file_output("Enviados 0 comandos"),
            Some(SendFileOutcome::Processed(0))
        );
    }

    #[test]
    fn test_success_markers() {
        assert!(contains_success_marker("Operacion exitosa"));
        assert!(contains_success_marker("Enviado correctamente"));
        assert!(contains_success_marker("procesado exitasomente"));
        assert!(!contains_success_marker("Error de comunicacion"));
    }
}
