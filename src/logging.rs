//! Logging setup for fridgelens
//!
//! Thin wrapper over `tracing-subscriber`. Output goes to stderr so that
//! configuration diagnostics (such as a missing API key) never mix with
//! analysis results printed on stdout.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the level passed to [`init_logging`].
pub const LOG_ENV_VAR: &str = "FRIDGELENS_LOG";

/// Log levels supported by fridgelens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    /// Default filter directive for this level, scoped to this crate.
    pub fn directive(self) -> String {
        format!("fridgelens={}", self.to_tracing_level())
    }
}

/// Initialize logging with a specific log level.
///
/// Call this once, before building a [`VisionConfig`](crate::VisionConfig), so
/// the missing-credential warning is visible.
///
/// # Examples
///
/// ```no_run
/// use fridgelens::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Info);
/// tracing::info!("Application starting");
/// ```
///
/// `FRIDGELENS_LOG=debug` takes precedence over the level passed here.
pub fn init_logging(level: LogLevel) {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    tracing::info!("fridgelens logging initialized at level: {:?}", level);
}

/// Initialize logging with a custom filter string, e.g.
/// `"fridgelens=debug,fridgelens::backend=trace"`.
pub fn init_logging_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| {
        tracing::warn!("Invalid filter string: {}, using default (info)", filter);
        EnvFilter::new(LogLevel::Info.directive())
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    tracing::info!("fridgelens logging initialized with custom filter: {}", filter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_is_crate_scoped() {
        assert_eq!(LogLevel::Warn.directive(), "fridgelens=WARN");
        assert_eq!(LogLevel::Trace.directive(), "fridgelens=TRACE");
    }
}
