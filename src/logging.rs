//! Log configuration.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

const DEFAULT_ENV_CONFIG: &str = "warn,review_reminder=info";
const VERBOSE_ENV_CONFIG: &str = "warn,review_reminder=debug";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not set tracing global default subscriber: {source}")]
    SetGlobalDefault {
        source: tracing::dispatcher::SetGlobalDefaultError,
    },
    #[error("Wrong env filter configuration {configuration:?}: {source}")]
    EnvFilterConfiguration {
        source: tracing_subscriber::filter::ParseError,
        configuration: String,
    },
}

/// Log to stderr; stdout carries the summary line and dry-run output.
///
/// `RUST_LOG` wins over `verbose`.
pub fn configure_logging(verbose: bool) -> Result<(), LoggingError> {
    let default = if verbose {
        VERBOSE_ENV_CONFIG
    } else {
        DEFAULT_ENV_CONFIG
    };
    let log_config = std::env::var("RUST_LOG").unwrap_or_else(|_| default.to_string());

    let filter_layer = EnvFilter::from_str(&log_config).map_err(|source| {
        LoggingError::EnvFilterConfiguration {
            source,
            configuration: log_config,
        }
    })?;
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let subscriber = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|source| LoggingError::SetGlobalDefault { source })
}
