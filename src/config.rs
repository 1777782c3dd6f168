use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en_US";
pub const DEFAULT_CONCORDANCE_URL: &str = "https://skell.sketchengine.eu/api/concordance";
pub const DEFAULT_COLLOCATION_URL: &str = "https://ozdic.com/collocation";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_EXAMPLES: usize = 3;

const ENV_DICTIONARY_URL: &str = "NOTEGLOSS_DICTIONARY_URL";
const ENV_CONCORDANCE_URL: &str = "NOTEGLOSS_CONCORDANCE_URL";
const ENV_COLLOCATION_URL: &str = "NOTEGLOSS_COLLOCATION_URL";
const ENV_TIMEOUT_SECS: &str = "NOTEGLOSS_TIMEOUT_SECS";
const ENV_MAX_EXAMPLES: &str = "NOTEGLOSS_MAX_EXAMPLES";

/// Base URLs of the three services. Trailing slashes are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub dictionary: String,
    pub concordance: String,
    pub collocation: String,
}

impl Endpoints {
    /// Points all three services at one host, using the production paths.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            dictionary: format!("{base}/api/v2/entries/en_US"),
            concordance: format!("{base}/api/concordance"),
            collocation: format!("{base}/collocation"),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            dictionary: DEFAULT_DICTIONARY_URL.to_string(),
            concordance: DEFAULT_CONCORDANCE_URL.to_string(),
            collocation: DEFAULT_COLLOCATION_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub endpoints: Endpoints,
    /// Per-request bound; a lane that exceeds it fails like any other lane.
    pub timeout: Duration,
    pub user_agent: String,
    pub max_examples: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            max_examples: DEFAULT_MAX_EXAMPLES,
        }
    }
}

impl EnrichConfig {
    /// Defaults overlaid with `NOTEGLOSS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_DICTIONARY_URL) {
            config.endpoints.dictionary = url;
        }
        if let Some(url) = lookup(ENV_CONCORDANCE_URL) {
            config.endpoints.concordance = url;
        }
        if let Some(url) = lookup(ENV_COLLOCATION_URL) {
            config.endpoints.collocation = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = parse_positive(ENV_TIMEOUT_SECS, &raw)?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_MAX_EXAMPLES) {
            config.max_examples = parse_positive(ENV_MAX_EXAMPLES, &raw)?;
        }
        Ok(config)
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let value: T = raw
        .trim()
        .parse()
        .map_err(|err: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            message: err.to_string(),
        })?;
    if value == T::default() {
        return Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
