//! Core record types and utilities for the dashboard pages

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod format;
pub mod seed;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use types::{
    AccessLog, Client, Idea, NpsCategory, NpsResponse, Origin, Tagged, Tier,
};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over the configured level. When a log file is
/// configured the returned guard must be kept alive for buffered lines to be
/// flushed.
///
/// # Errors
///
/// Returns an error if the level filter is invalid or a global subscriber is
/// already installed.
pub fn init_logging(
    config: &config::LoggingConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Configuration {
            message: format!("invalid log level {}: {e}", config.level),
        })?;

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().ok_or_else(|| Error::Configuration {
                message: format!("invalid log file path: {}", path.display()),
            })?;
            std::fs::create_dir_all(directory)?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    let installed = if config.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|e| Error::Other(format!("failed to install subscriber: {e}")))?;

    Ok(guard)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_rejects_bad_file_path() {
        let config = config::LoggingConfig {
            level: "info".to_string(),
            format: "json".to_string(),
            file: Some(std::path::PathBuf::from("/")),
        };

        let result = init_logging(&config);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }
}
