//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CREDENCE_*` environment variables; the
//! judge credential is also read from `OPENROUTER_API_KEY`.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_JUDGE_BASE_URL, DEFAULT_JUDGE_STAGGER_MS, DEFAULT_JUDGE_TIMEOUT_SECS,
    DEFAULT_SITE_NAME, DEFAULT_SITE_URL, MAX_JUDGE_STAGGER_MS, default_judges,
};
use crate::fusion::WeightConfig;
use crate::judge::JudgeSpec;

/// How judge requests are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JudgeTransport {
    /// OpenAI-compatible chat completions over HTTP (OpenRouter by default).
    #[default]
    OpenRouter,
    /// Provider-native APIs; credentials come from each provider's own env var.
    Native,
}

impl std::str::FromStr for JudgeTransport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" | "openai" | "http" => Ok(Self::OpenRouter),
            "native" | "genai" => Ok(Self::Native),
            _ => Err(ConfigError::InvalidTransport {
                value: s.to_string(),
            }),
        }
    }
}

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read overrides on top of defaults.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Local classifier directory (BERT config, weights, tokenizer).
    pub model_path: Option<PathBuf>,

    /// Credential for the OpenRouter transport.
    pub api_key: Option<String>,

    pub judge_base_url: String,

    pub judge_transport: JudgeTransport,

    pub judges: Vec<JudgeSpec>,

    /// Per-judge call timeout. Default: 60s.
    pub judge_timeout: Duration,

    /// Delay between successive judge launches. Default: 50ms.
    pub judge_stagger: Duration,

    /// Sent as `HTTP-Referer`.
    pub site_url: String,

    /// Sent as `X-Title`.
    pub site_name: String,

    /// Initial fusion policy; can be swapped at runtime through the settings endpoint.
    pub weights: WeightConfig,

    /// Bearer token enabling `PUT /v1/settings/weights`. Unset disables the endpoint.
    pub admin_token: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field("model_path", &self.model_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("judge_base_url", &self.judge_base_url)
            .field("judge_transport", &self.judge_transport)
            .field("judges", &self.judges)
            .field("judge_timeout", &self.judge_timeout)
            .field("judge_stagger", &self.judge_stagger)
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .field("weights", &self.weights)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_path: None,
            api_key: None,
            judge_base_url: DEFAULT_JUDGE_BASE_URL.to_string(),
            judge_transport: JudgeTransport::default(),
            judges: default_judges(),
            judge_timeout: Duration::from_secs(DEFAULT_JUDGE_TIMEOUT_SECS),
            judge_stagger: Duration::from_millis(DEFAULT_JUDGE_STAGGER_MS),
            site_url: DEFAULT_SITE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            weights: WeightConfig::default(),
            admin_token: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "CREDENCE_PORT";
    const ENV_BIND_ADDR: &'static str = "CREDENCE_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = "CREDENCE_MODEL_PATH";
    pub(crate) const ENV_API_KEY: &'static str = "CREDENCE_API_KEY";
    pub(crate) const ENV_OPENROUTER_API_KEY: &'static str = "OPENROUTER_API_KEY";
    const ENV_JUDGE_BASE_URL: &'static str = "CREDENCE_JUDGE_BASE_URL";
    const ENV_JUDGE_TRANSPORT: &'static str = "CREDENCE_JUDGE_TRANSPORT";
    const ENV_JUDGES: &'static str = "CREDENCE_JUDGES";
    const ENV_JUDGE_TIMEOUT_SECS: &'static str = "CREDENCE_JUDGE_TIMEOUT_SECS";
    const ENV_JUDGE_STAGGER_MS: &'static str = "CREDENCE_JUDGE_STAGGER_MS";
    const ENV_SITE_URL: &'static str = "CREDENCE_SITE_URL";
    const ENV_SITE_NAME: &'static str = "CREDENCE_SITE_NAME";
    const ENV_LOCAL_MODEL_WEIGHT: &'static str = "CREDENCE_LOCAL_MODEL_WEIGHT";
    const ENV_LLM_WEIGHT: &'static str = "CREDENCE_LLM_WEIGHT";
    const ENV_FAKE_THRESHOLD: &'static str = "CREDENCE_FAKE_THRESHOLD";
    const ENV_REAL_THRESHOLD: &'static str = "CREDENCE_REAL_THRESHOLD";
    const ENV_ADMIN_TOKEN: &'static str = "CREDENCE_ADMIN_TOKEN";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let api_key = Self::parse_optional_string_from_env(Self::ENV_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_OPENROUTER_API_KEY));
        let judge_base_url =
            Self::parse_string_from_env(Self::ENV_JUDGE_BASE_URL, defaults.judge_base_url);
        let judge_transport = match Self::parse_optional_string_from_env(Self::ENV_JUDGE_TRANSPORT)
        {
            Some(value) => value.parse()?,
            None => defaults.judge_transport,
        };
        let judges = Self::parse_judges_from_env(defaults.judges)?;
        let judge_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_JUDGE_TIMEOUT_SECS,
            DEFAULT_JUDGE_TIMEOUT_SECS,
        ));
        let judge_stagger = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_JUDGE_STAGGER_MS,
            DEFAULT_JUDGE_STAGGER_MS,
        ));
        let site_url = Self::parse_string_from_env(Self::ENV_SITE_URL, defaults.site_url);
        let site_name = Self::parse_string_from_env(Self::ENV_SITE_NAME, defaults.site_name);

        let weights = WeightConfig {
            local_weight: Self::parse_f64_from_env(
                Self::ENV_LOCAL_MODEL_WEIGHT,
                defaults.weights.local_weight,
            )?,
            external_weight: Self::parse_f64_from_env(
                Self::ENV_LLM_WEIGHT,
                defaults.weights.external_weight,
            )?,
            fake_threshold: Self::parse_f64_from_env(
                Self::ENV_FAKE_THRESHOLD,
                defaults.weights.fake_threshold,
            )?,
            real_threshold: Self::parse_f64_from_env(
                Self::ENV_REAL_THRESHOLD,
                defaults.weights.real_threshold,
            )?,
        };
        let admin_token = Self::parse_optional_string_from_env(Self::ENV_ADMIN_TOKEN);

        Ok(Self {
            port,
            bind_addr,
            model_path,
            api_key,
            judge_base_url,
            judge_transport,
            judges,
            judge_timeout,
            judge_stagger,
            site_url,
            site_name,
            weights,
            admin_token,
        })
    }

    /// Validates paths and policy invariants (no network access).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        self.weights
            .validate()
            .map_err(|reason| ConfigError::InvalidWeights { reason })?;

        for spec in &self.judges {
            if spec.id.trim().is_empty() {
                return Err(ConfigError::InvalidJudges {
                    reason: "judge id cannot be empty".to_string(),
                });
            }
            if !spec.weight.is_finite() || spec.weight < 0.0 {
                return Err(ConfigError::InvalidJudges {
                    reason: format!("judge '{}' has invalid weight {}", spec.id, spec.weight),
                });
            }
        }

        if self.judge_stagger > Duration::from_millis(MAX_JUDGE_STAGGER_MS) {
            return Err(ConfigError::InvalidNumber {
                name: Self::ENV_JUDGE_STAGGER_MS,
                value: self.judge_stagger.as_millis().to_string(),
            });
        }

        if self.judge_timeout.is_zero() {
            return Err(ConfigError::InvalidNumber {
                name: Self::ENV_JUDGE_TIMEOUT_SECS,
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_judges_from_env(default: Vec<JudgeSpec>) -> Result<Vec<JudgeSpec>, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_JUDGES) {
            Some(value) => serde_json::from_str(&value).map_err(|e| ConfigError::InvalidJudges {
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_f64_from_env(var_name: &'static str, default: f64) -> Result<f64, ConfigError> {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                }),
            None => Ok(default),
        }
    }
}
