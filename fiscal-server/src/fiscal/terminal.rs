//! Terminal directory resolution
//!
//! Every terminal maps to `base_path/<terminalUUID>`, provisioned
//! externally. The resolver only validates: the directory must exist
//! and must resolve strictly inside the base path. It never creates
//! anything.

use std::path::{Path, PathBuf};

use crate::fiscal::{FiscalError, FiscalResult};

/// Resolve and validate the working directory for a terminal.
pub fn resolve_terminal_dir(base_path: &Path, terminal: &str) -> FiscalResult<PathBuf> {
    if terminal.is_empty() {
        return Err(FiscalError::InvalidTerminal(
            "terminalUUID must not be empty".to_string(),
        ));
    }

    // Separators and parent references never appear in a legitimate
    // terminal identifier; reject before touching the filesystem.
    if terminal.contains(['/', '\\']) || terminal.contains("..") {
        return Err(FiscalError::InvalidTerminal(format!(
            "terminalUUID contains path components: {terminal:?}"
        )));
    }

    let base = base_path
        .canonicalize()
        .map_err(|e| FiscalError::UnknownTerminal {
            terminal: terminal.to_string(),
            reason: format!("base path {} not accessible: {}", base_path.display(), e),
        })?;

    let dir = base
        .join(terminal)
        .canonicalize()
        .map_err(|_| FiscalError::UnknownTerminal {
            terminal: terminal.to_string(),
            reason: format!("no directory under {}", base.display()),
        })?;

    // Belt and braces: canonicalization already collapsed any
    // indirection, the prefix check catches symlink escapes.
    if !dir.starts_with(&base) {
        return Err(FiscalError::InvalidTerminal(format!(
            "terminalUUID resolves outside the base path: {terminal:?}"
        )));
    }

    if !dir.is_dir() {
        return Err(FiscalError::UnknownTerminal {
            terminal: terminal.to_string(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_existing_terminal() {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("caja-1")).unwrap();

        let dir = resolve_terminal_dir(base.path(), "caja-1").unwrap();
        assert!(dir.ends_with("caja-1"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_unknown_terminal_rejected() {
        let base = tempfile::tempdir().unwrap();
        let err = resolve_terminal_dir(base.path(), "caja-9").unwrap_err();
        assert!(matches!(err, FiscalError::UnknownTerminal { .. }));
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let base = tempfile::tempdir().unwrap();
        let err = resolve_terminal_dir(base.path(), "").unwrap_err();
        assert!(matches!(err, FiscalError::InvalidTerminal(_)));
    }

    #[test]
    fn test_traversal_rejected() {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("caja-1")).unwrap();

        for attempt in ["../caja-1", "..", "caja-1/../..", "a/b", "a\\b"] {
            let err = resolve_terminal_dir(base.path(), attempt).unwrap_err();
            assert!(
                matches!(err, FiscalError::InvalidTerminal(_)),
                "{attempt} should be rejected as invalid"
            );
        }
    }

    #[test]
    fn test_file_is_not_a_terminal() {
        let base = tempfile::tempdir().unwrap();
        std::fs::write(base.path().join("caja-1"), b"x").unwrap();

        let err = resolve_terminal_dir(base.path(), "caja-1").unwrap_err();
        assert!(matches!(err, FiscalError::UnknownTerminal { .. }));
    }
}
