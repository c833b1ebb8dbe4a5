use crate::config::{defaults, validate_common};
use crate::domain::model::Coordinate;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::Validate;
use clap::Args;
use std::time::Duration;

#[derive(Debug, Clone, Args)]
pub struct CliConfig {
    #[arg(long, default_value = defaults::DEFAULT_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, env = "GEOAPIFY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value_t = defaults::TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Retry once on timeouts and connection failures")]
    pub retry_transport_errors: bool,

    #[arg(long, default_value_t = defaults::RADIUS_METERS)]
    pub radius_meters: u32,

    #[arg(long, default_value_t = defaults::DEFAULT_LIMIT)]
    pub default_limit: usize,

    #[arg(long, default_value_t = defaults::MAX_LIMIT)]
    pub max_limit: usize,

    #[arg(long, default_value_t = defaults::MIN_OVERFETCH_MULTIPLIER)]
    pub overfetch_multiplier: usize,

    #[arg(long, help = "Query both category tiers concurrently")]
    pub parallel_tiers: bool,

    #[arg(long, default_value_t = defaults::MOCK_COUNT)]
    pub mock_count: usize,

    #[arg(long, help = "Seed for reproducible synthetic facilities")]
    pub mock_seed: Option<u64>,

    #[arg(long, default_value_t = defaults::DEFAULT_LATITUDE, allow_negative_numbers = true)]
    pub default_latitude: f64,

    #[arg(long, default_value_t = defaults::DEFAULT_LONGITUDE, allow_negative_numbers = true)]
    pub default_longitude: f64,

    #[arg(long, default_value = defaults::NOTIFICATION_BASE_URL)]
    pub notification_base_url: String,

    #[arg(long, default_value = defaults::NOTIFICATION_PHONE)]
    pub notification_phone: String,

    #[arg(long, default_value = defaults::TRACKING_PATH)]
    pub tracking_path: String,

    #[arg(long, default_value = defaults::PLACEHOLDER_FACILITY)]
    pub placeholder_facility: String,
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn retry_transport_errors(&self) -> bool {
        self.retry_transport_errors
    }

    fn search_radius_meters(&self) -> u32 {
        self.radius_meters
    }

    fn default_limit(&self) -> usize {
        self.default_limit
    }

    fn max_limit(&self) -> usize {
        self.max_limit
    }

    fn overfetch_multiplier(&self) -> usize {
        self.overfetch_multiplier
    }

    fn parallel_tiers(&self) -> bool {
        self.parallel_tiers
    }

    fn mock_count(&self) -> usize {
        self.mock_count
    }

    fn mock_seed(&self) -> Option<u64> {
        self.mock_seed
    }

    fn default_coordinate(&self) -> Coordinate {
        Coordinate::new(self.default_latitude, self.default_longitude).unwrap_or(Coordinate::ORIGIN)
    }

    fn notification_base_url(&self) -> &str {
        &self.notification_base_url
    }

    fn notification_phone(&self) -> &str {
        &self.notification_phone
    }

    fn tracking_path(&self) -> &str {
        &self.tracking_path
    }

    fn placeholder_facility(&self) -> &str {
        &self.placeholder_facility
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_common(self)?;
        Coordinate::new(self.default_latitude, self.default_longitude).map_err(|e| {
            LocatorError::ConfigValidationError {
                field: "default_latitude/default_longitude".to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }
}
