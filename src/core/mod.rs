pub mod classifier;
pub mod dispatch;
pub mod engine;
pub mod finder;
pub mod geo;
pub mod mock;

pub use crate::domain::model::{Coordinate, DiscoveryResult, DispatchPlan, FacilityCandidate};
pub use crate::domain::ports::{ConfigProvider, PlacesProvider};
pub use crate::utils::error::Result;
