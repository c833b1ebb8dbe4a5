use crate::config::{defaults, validate_common};
use crate::domain::model::Coordinate;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub provider: ProviderConfig,
    pub search: SearchConfig,
    pub fallback: FallbackConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub retry_transport_errors: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_seconds: defaults::TIMEOUT_SECONDS,
            retry_transport_errors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_meters: u32,
    pub default_limit: usize,
    pub max_limit: usize,
    pub overfetch_multiplier: usize,
    pub parallel_tiers: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_meters: defaults::RADIUS_METERS,
            default_limit: defaults::DEFAULT_LIMIT,
            max_limit: defaults::MAX_LIMIT,
            overfetch_multiplier: defaults::MIN_OVERFETCH_MULTIPLIER,
            parallel_tiers: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub mock_count: usize,
    pub mock_seed: Option<u64>,
    pub default_latitude: f64,
    pub default_longitude: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            mock_count: defaults::MOCK_COUNT,
            mock_seed: None,
            default_latitude: defaults::DEFAULT_LATITUDE,
            default_longitude: defaults::DEFAULT_LONGITUDE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub notification_base_url: String,
    pub notification_phone: String,
    pub tracking_path: String,
    pub placeholder_facility: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            notification_base_url: defaults::NOTIFICATION_BASE_URL.to_string(),
            notification_phone: defaults::NOTIFICATION_PHONE.to_string(),
            tracking_path: defaults::TRACKING_PATH.to_string(),
            placeholder_facility: defaults::PLACEHOLDER_FACILITY.to_string(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| LocatorError::ConfigError {
                message: format!("cannot read '{}': {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| LocatorError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // 未設定的 ${VAR} 保持原樣，金鑰視為不存在
        if let Some(key) = &config.provider.api_key {
            if key.trim().is_empty() || env_var_pattern().is_match(key) {
                config.provider.api_key = None;
            }
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${GEOAPIFY_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.provider.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.provider.api_key.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_seconds)
    }

    fn retry_transport_errors(&self) -> bool {
        self.provider.retry_transport_errors
    }

    fn search_radius_meters(&self) -> u32 {
        self.search.radius_meters
    }

    fn default_limit(&self) -> usize {
        self.search.default_limit
    }

    fn max_limit(&self) -> usize {
        self.search.max_limit
    }

    fn overfetch_multiplier(&self) -> usize {
        self.search.overfetch_multiplier
    }

    fn parallel_tiers(&self) -> bool {
        self.search.parallel_tiers
    }

    fn mock_count(&self) -> usize {
        self.fallback.mock_count
    }

    fn mock_seed(&self) -> Option<u64> {
        self.fallback.mock_seed
    }

    fn default_coordinate(&self) -> Coordinate {
        Coordinate::new(self.fallback.default_latitude, self.fallback.default_longitude)
            .unwrap_or(Coordinate::ORIGIN)
    }

    fn notification_base_url(&self) -> &str {
        &self.dispatch.notification_base_url
    }

    fn notification_phone(&self) -> &str {
        &self.dispatch.notification_phone
    }

    fn tracking_path(&self) -> &str {
        &self.dispatch.tracking_path
    }

    fn placeholder_facility(&self) -> &str {
        &self.dispatch.placeholder_facility
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_common(self)?;
        Coordinate::new(self.fallback.default_latitude, self.fallback.default_longitude).map_err(
            |e| LocatorError::ConfigValidationError {
                field: "fallback.default_latitude/default_longitude".to_string(),
                message: e.to_string(),
            },
        )?;
        Ok(())
    }
}
