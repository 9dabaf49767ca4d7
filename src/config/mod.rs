//! Configuration

use std::time::Duration;

use clap::{Args, ValueEnum};

use crate::api::HttpStorefrontConfig;

/// Noisy dependencies held at `warn` whatever the requested level.
const QUIET_DEPENDENCIES: &str = "hyper=warn,reqwest=warn,rustls=warn";

/// Backend connection settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Base URL of the storefront API
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:5001/api")]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECONDS", default_value_t = 10u64)]
    pub request_timeout_seconds: u64,
}

impl ApiConfig {
    /// HTTP client settings derived from the configuration.
    #[must_use]
    pub fn http(&self) -> HttpStorefrontConfig {
        HttpStorefrontConfig {
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_seconds),
        }
    }
}

/// How log lines are written to stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One human-readable line per event
    #[default]
    Compact,

    /// One JSON object per event
    Json,
}

/// Log level and output format.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Level or filter directives, e.g. `debug` or `diecast=trace`
    #[arg(short = 'l', long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t)]
    pub log_format: LogFormat,
}

impl LoggingConfig {
    /// Filter directives for the subscriber.
    pub fn directives(&self) -> String {
        format!("{},{QUIET_DEPENDENCIES}", self.log_level)
    }
}

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Backend connection settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
