use crate::domain::model::{Coordinate, PlaceRecord, SearchRequest};
use async_trait::async_trait;
use std::time::Duration;

/// A places-search backend. Failures never surface: an unreachable or
/// misbehaving provider yields an empty list.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    fn has_credential(&self) -> bool;
    async fn search(&self, request: &SearchRequest) -> Vec<PlaceRecord>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
    fn retry_transport_errors(&self) -> bool;

    fn search_radius_meters(&self) -> u32;
    fn default_limit(&self) -> usize;
    fn max_limit(&self) -> usize;
    fn overfetch_multiplier(&self) -> usize;
    fn parallel_tiers(&self) -> bool;

    fn mock_count(&self) -> usize;
    fn mock_seed(&self) -> Option<u64>;
    fn default_coordinate(&self) -> Coordinate;

    fn notification_base_url(&self) -> &str;
    fn notification_phone(&self) -> &str;
    fn tracking_path(&self) -> &str;
    fn placeholder_facility(&self) -> &str;
}
