//! Tracing setup shared by the daemon and the CLI.
//!
//! Call [`init_tracing`] once at startup. `RUST_LOG` overrides the default
//! level; without it the filter defaults to `eventd=<level>`.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization.
#[derive(Debug, Error)]
pub enum TracingError {
    /// The global subscriber has already been installed.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// The env filter directive did not parse.
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line output, suited to interactive use.
    #[default]
    Compact,
    /// Multi-line human-readable output.
    Pretty,
    /// Structured JSON, suited to daemon logs.
    Json,
}

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level used when `RUST_LOG` is not set.
    pub default_level: Level,
    /// Output format.
    pub format: LogFormat,
    /// Whether to include file/line locations.
    pub include_location: bool,
    /// Custom filter directive overriding `default_level`.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            format: LogFormat::Compact,
            include_location: false,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Preset for the interactive CLI: warnings only, no noise.
    #[must_use]
    pub fn cli() -> Self {
        Self {
            default_level: Level::WARN,
            ..Default::default()
        }
    }

    /// Preset for the daemon: JSON output with locations.
    #[must_use]
    pub fn daemon() -> Self {
        Self {
            default_level: Level::INFO,
            format: LogFormat::Json,
            include_location: true,
            env_filter: None,
        }
    }

    /// Sets the default level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom env filter directive.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the filter directive is
/// invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = if let Some(ref filter) = config.env_filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("eventd={}", config.default_level)))
    };

    match config.format {
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .compact()
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            );
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .pretty()
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            );
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .json()
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            );
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}
