#[cfg(feature = "cli")]
pub mod cli;
pub mod defaults;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::adapters::geoapify::MIN_OVERFETCH_MULTIPLIER;
use crate::core::mock::MIN_MOCK_COUNT;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_relative_path, validate_url,
};

/// Checks shared by every configuration source.
pub(crate) fn validate_common<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_url("provider.endpoint", config.api_endpoint())?;
    validate_positive_number(
        "provider.timeout_seconds",
        config.request_timeout().as_secs() as usize,
        1,
    )?;

    validate_positive_number("search.radius_meters", config.search_radius_meters() as usize, 1)?;
    validate_positive_number("search.default_limit", config.default_limit(), 1)?;
    validate_positive_number("search.max_limit", config.max_limit(), 1)?;
    if config.default_limit() > config.max_limit() {
        return Err(LocatorError::ConfigValidationError {
            field: "search.default_limit".to_string(),
            message: format!(
                "default limit {} exceeds max limit {}",
                config.default_limit(),
                config.max_limit()
            ),
        });
    }
    validate_positive_number(
        "search.overfetch_multiplier",
        config.overfetch_multiplier(),
        MIN_OVERFETCH_MULTIPLIER,
    )?;

    validate_positive_number("fallback.mock_count", config.mock_count(), MIN_MOCK_COUNT)?;

    validate_url("dispatch.notification_base_url", config.notification_base_url())?;
    validate_non_empty_string("dispatch.notification_phone", config.notification_phone())?;
    validate_relative_path("dispatch.tracking_path", config.tracking_path())?;
    validate_non_empty_string("dispatch.placeholder_facility", config.placeholder_facility())?;

    Ok(())
}
