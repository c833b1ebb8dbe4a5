pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::geoapify::GeoapifyClient;
pub use core::engine::LocatorEngine;
pub use domain::model::{
    Coordinate, DiscoverQuery, DiscoverResponse, DiscoveryOutcome, DiscoveryResult, DispatchPlan,
    DispatchQuery, DispatchResponse, FacilityCandidate,
};
pub use utils::error::{LocatorError, Result};
