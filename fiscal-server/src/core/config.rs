use std::time::Duration;

use fiscal_protocol::EncoderConfig;

use crate::fiscal::executor::RetryPolicy;
use crate::fiscal::runner::InvocationStyle;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 5000 | HTTP listen port |
/// | FISCAL_BASE_PATH | ./terminales | Parent of per-terminal directories |
/// | FISCAL_EXECUTABLE | IntTFHKA / tfinulx | Executable name inside each terminal dir |
/// | FISCAL_INVOCATION | platform default | `parenthesized` or `argv` |
/// | FISCAL_PROCESS_TIMEOUT_SECS | 45 | Executable wall-clock budget |
/// | FISCAL_RETRY_MAX_ATTEMPTS | 3 | Attempts for transient zero-processed responses |
/// | FISCAL_RETRY_DELAY_MS | 300 | Delay between attempts |
/// | FISCAL_IGTF_SLOTS | 20,21,22,23,24 | Tender slots that trigger the `199` closer |
/// | FISCAL_FORCE_IGTF | false | Always emit the `199` closer |
/// | WRITE_VERIFY_TIMEOUT_MS | 3000 | Command-file validation budget |
/// | WRITE_POLL_INTERVAL_MS | 50 | Command-file poll interval |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | tracing filter directive |
/// | LOG_DIR | unset | Enables daily rolling file logs when set |
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    /// Parent directory of the per-terminal directories
    pub base_path: String,
    /// Vendor executable name, looked up inside each terminal directory
    pub executable: String,
    /// Argument convention of the installed executable build
    pub invocation: InvocationStyle,
    /// Wall-clock budget per invocation
    pub process_timeout: Duration,
    pub retry_max_attempts: u32,
    pub retry_delay: Duration,
    /// Tender slots subject to the IGTF surcharge
    pub igtf_slots: Vec<i64>,
    /// Emit the IGTF closer on every invoice regardless of slots
    pub force_igtf: bool,
    pub write_verify_timeout: Duration,
    pub write_poll_interval: Duration,
    pub environment: String,
    pub log_level: String,
    /// Daily rolling file logs are written here when set
    pub log_dir: Option<String>,
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_executable() -> String {
    if cfg!(windows) { "IntTFHKA.exe" } else { "tfinulx" }.to_string()
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let invocation = std::env::var("FISCAL_INVOCATION")
            .ok()
            .and_then(|v| InvocationStyle::from_name(&v))
            .unwrap_or_else(InvocationStyle::for_host);

        let igtf_slots = std::env::var("FISCAL_IGTF_SLOTS")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|s| s.trim().parse().ok())
                    .collect()
            })
            .unwrap_or_else(|| fiscal_protocol::IGTF_SLOTS.to_vec());

        Self {
            http_port: env_parsed("HTTP_PORT", 5000),
            base_path: std::env::var("FISCAL_BASE_PATH")
                .unwrap_or_else(|_| "./terminales".into()),
            executable: std::env::var("FISCAL_EXECUTABLE").unwrap_or_else(|_| default_executable()),
            invocation,
            process_timeout: Duration::from_secs(env_parsed("FISCAL_PROCESS_TIMEOUT_SECS", 45)),
            retry_max_attempts: env_parsed("FISCAL_RETRY_MAX_ATTEMPTS", 3),
            retry_delay: Duration::from_millis(env_parsed("FISCAL_RETRY_DELAY_MS", 300)),
            igtf_slots,
            force_igtf: env_parsed("FISCAL_FORCE_IGTF", false),
            write_verify_timeout: Duration::from_millis(env_parsed("WRITE_VERIFY_TIMEOUT_MS", 3000)),
            write_poll_interval: Duration::from_millis(env_parsed("WRITE_POLL_INTERVAL_MS", 50)),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override the fields tests care about
    pub fn with_overrides(base_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.base_path = base_path.into();
        config.http_port = http_port;
        config
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts.max(1),
            delay: self.retry_delay,
        }
    }

    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig {
            surcharge_slots: self.igtf_slots.clone(),
            force_surcharge: self.force_igtf,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let config = Config::with_overrides("/tmp/terminales", 9123);
        assert_eq!(config.base_path, "/tmp/terminales");
        assert_eq!(config.http_port, 9123);
        assert!(config.retry_policy().max_attempts >= 1);
    }
}
