//! Tracing subscriber setup. All output goes to stderr so stdio MCP stays clean.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ConfigError;

/// Installs the global subscriber.
///
/// `log_level` takes precedence over `RUST_LOG`; the default is `info`.
///
/// # Errors
/// Returns `ConfigError::Logging` for an unparseable filter or when a
/// subscriber is already installed.
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> Result<(), ConfigError> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = log_level.unwrap_or(&default_level);

    let env_filter = EnvFilter::try_new(filter)
        .map_err(|err| ConfigError::Logging(format!("invalid log filter {filter:?}: {err}")))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(use_color(no_color, std::env::var_os("NO_COLOR").is_some()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| ConfigError::Logging(err.to_string()))
}

const fn use_color(no_color_flag: bool, no_color_env: bool) -> bool {
    !no_color_flag && !no_color_env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn either_switch_disables_color() {
        assert!(use_color(false, false));
        assert!(!use_color(true, false));
        assert!(!use_color(false, true));
    }

    #[test]
    fn bad_filter_is_a_config_error() {
        let err = init_logging(Some("pharmadocs=loud"), true).expect_err("invalid filter");
        assert!(matches!(err, ConfigError::Logging(_)));
    }
}
