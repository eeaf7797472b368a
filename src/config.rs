use std::time::Duration;

use reqwest::Url;

use crate::contract::{ContractPreset, UnknownPreset, DEFAULT_MAX_PAYLOAD_BYTES};
use crate::report::OutputFormat;

/// Base URL used when no positional argument is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request timeout (10 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Contract(#[from] UnknownPreset),
    #[error("{name} must be a positive integer, got {value:?}")]
    NotPositive { name: &'static str, value: String },
    #[error("ORDERS_CHECK_FORMAT must be \"text\" or \"json\", got {0:?}")]
    Format(String),
    #[error("unexpected argument {0:?} (usage: orders-contract-check [BASE_URL])")]
    ExtraArgument(String),
    #[error("BASE_URL must be an http(s) URL with a host, got {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
}

/// Checker configuration: one optional positional argument plus environment.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub base_url: String,
    pub contract: ContractPreset,
    pub timeout: Duration,
    pub max_payload_bytes: usize,
    pub format: OutputFormat,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            contract: ContractPreset::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            format: OutputFormat::default(),
        }
    }
}

impl CheckerConfig {
    /// Load configuration from process arguments and environment.
    ///
    /// - first positional argument (optional): base URL of the server
    /// - `ORDERS_CHECK_CONTRACT` (optional, default `minor-units`): contract preset
    /// - `ORDERS_CHECK_TIMEOUT_SECS` (optional, default 10): per-request timeout
    /// - `ORDERS_CHECK_MAX_PAYLOAD_BYTES` (optional, default 51200): exclusive body size limit
    /// - `ORDERS_CHECK_FORMAT` (optional, `text` or `json`, default `text`): report format
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(std::env::args().skip(1), |name| std::env::var(name).ok())
    }

    /// Build from explicit arguments and an environment lookup.
    pub fn from_sources(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let mut args = args.into_iter();
        if let Some(url) = args.next() {
            config.base_url = url;
        }
        if let Some(extra) = args.next() {
            return Err(ConfigError::ExtraArgument(extra));
        }
        validate_base_url(&config.base_url)?;

        if let Some(name) = env("ORDERS_CHECK_CONTRACT") {
            config.contract = name.parse()?;
        }
        if let Some(secs) = positive("ORDERS_CHECK_TIMEOUT_SECS", env("ORDERS_CHECK_TIMEOUT_SECS"))? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = positive(
            "ORDERS_CHECK_MAX_PAYLOAD_BYTES",
            env("ORDERS_CHECK_MAX_PAYLOAD_BYTES"),
        )? {
            config.max_payload_bytes = usize::try_from(bytes).map_err(|_| ConfigError::NotPositive {
                name: "ORDERS_CHECK_MAX_PAYLOAD_BYTES",
                value: bytes.to_string(),
            })?;
        }
        if let Some(format) = env("ORDERS_CHECK_FORMAT") {
            config.format = match format.trim() {
                "text" => OutputFormat::Text,
                "json" => OutputFormat::Json,
                _ => return Err(ConfigError::Format(format)),
            };
        }

        Ok(config)
    }
}

fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::BaseUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
    }
    if !parsed.has_host() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

fn positive(name: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::NotPositive { name, value }),
    }
}
