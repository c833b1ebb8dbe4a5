pub use crate::adapters::geoapify::{DEFAULT_ENDPOINT, MIN_OVERFETCH_MULTIPLIER};

pub const TIMEOUT_SECONDS: u64 = 30;
pub const RADIUS_METERS: u32 = 50_000;
pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 50;
pub const MOCK_COUNT: usize = 10;
pub const DEFAULT_LATITUDE: f64 = 0.0;
pub const DEFAULT_LONGITUDE: f64 = 0.0;
pub const NOTIFICATION_BASE_URL: &str = "https://api.whatsapp.com/send";
pub const NOTIFICATION_PHONE: &str = "919845325913";
pub const TRACKING_PATH: &str = "/ambulance/tracking";
pub const PLACEHOLDER_FACILITY: &str = "City Cancer Center";
