//! Logging setup
//!
//! Console output by default; with a log directory, daily rolling files
//! named `offer-engine.YYYY-MM-DD`. `RUST_LOG` overrides the configured level.

use std::path::Path;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "offer-engine";

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Console logger at `info`
pub fn init_logger() -> bool {
    init_logger_with_file(None, None, None)
}

/// Install the global subscriber
///
/// Returns `false` when a subscriber was already installed. A `log_dir` that
/// does not exist falls back to console output.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level.unwrap_or("info")))
        .with_thread_ids(false)
        .with_target(false);

    let result = match log_dir.map(Path::new).filter(|dir| dir.is_dir()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let builder = builder.with_writer(appender).with_ansi(false);
            if json.unwrap_or(false) {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        None => builder.try_init(),
    };
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_ignored() {
        let _ = init_logger_with_file(Some("debug"), None, Some("/nonexistent/offer-logs"));
        assert!(!init_logger());
    }
}
