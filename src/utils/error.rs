use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Provider responded with HTTP {status}")]
    ProviderStatusError { status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid input: {message}")]
    InputError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Provider,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LocatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LocatorError::ApiError(_) | LocatorError::ProviderStatusError { .. } => {
                ErrorCategory::Provider
            }
            LocatorError::ConfigError { .. }
            | LocatorError::ConfigValidationError { .. }
            | LocatorError::InvalidConfigValueError { .. }
            | LocatorError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LocatorError::InputError { .. } => ErrorCategory::Input,
            LocatorError::IoError(_) | LocatorError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LocatorError::InputError { .. } => ErrorSeverity::Low,
            LocatorError::ApiError(_) | LocatorError::ProviderStatusError { .. } => {
                ErrorSeverity::Medium
            }
            LocatorError::ConfigError { .. }
            | LocatorError::ConfigValidationError { .. }
            | LocatorError::InvalidConfigValueError { .. }
            | LocatorError::MissingConfigError { .. } => ErrorSeverity::High,
            LocatorError::IoError(_) | LocatorError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 傳輸層錯誤 (逾時、連線失敗) 才值得重試，HTTP 狀態碼錯誤不重試
    pub fn is_transport(&self) -> bool {
        match self {
            LocatorError::ApiError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LocatorError::ApiError(_) => "Could not reach the places provider".to_string(),
            LocatorError::ProviderStatusError { status } => {
                format!("The places provider rejected the request (HTTP {})", status)
            }
            LocatorError::IoError(e) => format!("File system error: {}", e),
            LocatorError::SerializationError(_) => "Failed to encode or decode JSON".to_string(),
            LocatorError::ConfigError { message } => format!("Configuration problem: {}", message),
            LocatorError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            LocatorError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            LocatorError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            LocatorError::InputError { message } => format!("Invalid request: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the configuration file and command line flags"
            }
            ErrorCategory::Provider => {
                "Verify GEOAPIFY_API_KEY and network connectivity, or run without a key to use synthetic data"
            }
            ErrorCategory::Input => "Provide latitude in [-90, 90] and longitude in [-180, 180]",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;
