//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem with human-readable or JSON output. Logs go
//! to stderr; stdout carries the status report.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section, with CLI overrides.
pub fn init_from_config(config: &lumen_core::Config, verbose: bool, json_logs: bool) {
    let (level, json_format) = resolve(config, verbose, json_logs);
    init(level, json_format);
}

/// Effective level and format. `--verbose` never lowers a configured `trace`.
fn resolve(config: &lumen_core::Config, verbose: bool, json_logs: bool) -> (&str, bool) {
    let level = match config.logging.level.as_str() {
        "trace" => "trace",
        _ if verbose => "debug",
        "" => "info",
        other => other,
    };
    let json_format = json_logs || config.logging.format == "json";
    (level, json_format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_default_level() {
        let config = lumen_core::Config::default();
        assert_eq!(resolve(&config, false, false), ("info", false));
        assert_eq!(resolve(&config, true, false), ("debug", false));
    }

    #[test]
    fn config_format_and_level_are_respected() {
        let mut config = lumen_core::Config::default();
        config.logging.level = "trace".to_string();
        config.logging.format = "json".to_string();
        assert_eq!(resolve(&config, true, false), ("trace", true));

        config.logging.level = "warn".to_string();
        config.logging.format = "pretty".to_string();
        assert_eq!(resolve(&config, false, true), ("warn", true));
    }
}
