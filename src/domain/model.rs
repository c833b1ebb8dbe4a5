use crate::core::geo;
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::validate_range;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        validate_range("latitude", latitude, -90.0, 90.0)
            .and_then(|_| validate_range("longitude", longitude, -180.0, 180.0))
            .map_err(|e| LocatorError::InputError {
                message: e.to_string(),
            })?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a coordinate from possibly-missing request fields.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Result<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => Err(LocatorError::InputError {
                message: "latitude and longitude are both required".to_string(),
            }),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTier {
    Specific,
    Broad,
}

impl CategoryTier {
    pub fn category(&self) -> &'static str {
        match self {
            CategoryTier::Specific => "healthcare.hospital",
            CategoryTier::Broad => "healthcare",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub center: Coordinate,
    pub radius_meters: u32,
    pub category_tier: CategoryTier,
    pub result_cap: usize,
}

/// A place as decoded from the provider, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub categories: BTreeSet<String>,
    pub coordinate: Coordinate,
}

pub const UNNAMED_FACILITY: &str = "Nearby Medical Facility";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityCandidate {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub categories: BTreeSet<String>,
    coordinate: Coordinate,
    distance_km: f64,
}

impl FacilityCandidate {
    /// Distance is derived here and nowhere else, so it always matches the coordinate.
    pub fn new(
        name: String,
        address: Option<String>,
        phone: Option<String>,
        categories: BTreeSet<String>,
        coordinate: Coordinate,
        origin: &Coordinate,
    ) -> Self {
        Self {
            name,
            address,
            phone,
            categories,
            coordinate,
            distance_km: geo::distance_km(origin, &coordinate),
        }
    }

    pub fn from_place(place: PlaceRecord, origin: &Coordinate) -> Self {
        let name = place
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| place.address.clone())
            .unwrap_or_else(|| UNNAMED_FACILITY.to_string());
        Self::new(
            name,
            place.address,
            place.phone,
            place.categories,
            place.coordinate,
            origin,
        )
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    MissingCredential,
    InvalidInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscoveryOutcome {
    Ranked { tier: CategoryTier },
    NoCoverage,
    Synthetic { reason: FallbackReason },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryResult {
    pub origin: Coordinate,
    pub facilities: Vec<FacilityCandidate>,
    pub outcome: DiscoveryOutcome,
}

impl DiscoveryResult {
    pub fn is_synthetic(&self) -> bool {
        matches!(self.outcome, DiscoveryOutcome::Synthetic { .. })
    }
}

/// Inbound Discover request; every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<u32>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorityTier {
    P1,
    P2,
    P3,
}

impl PriorityTier {
    pub fn label(&self) -> &'static str {
        match self {
            PriorityTier::P1 => "Priority 1",
            PriorityTier::P2 => "Priority 2",
            PriorityTier::P3 => "Priority 3",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PriorityTier::P1 => "Life-threatening (High Risk)",
            PriorityTier::P2 => "Urgent (Moderate Risk)",
            PriorityTier::P3 => "Non-urgent (Low Risk)",
        }
    }
}

/// Where the ambulance is routed: the chosen facility or the placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub name: String,
    pub coordinate: Coordinate,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchPlan {
    pub priority_tier: PriorityTier,
    pub priority_description: String,
    pub facility: Option<FacilityCandidate>,
    pub destination: Destination,
    pub eta_minutes: u32,
    pub notification_url: String,
    pub tracking_url: String,
    pub is_synthetic: bool,
}

// ---- 對外回應格式 ----

#[derive(Debug, Clone, Serialize)]
pub struct FacilitySummary {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub distance_km: f64,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResponse {
    pub facilities: Vec<FacilitySummary>,
    pub outcome: DiscoveryOutcome,
    pub is_synthetic: bool,
}

impl From<DiscoveryResult> for DiscoverResponse {
    fn from(result: DiscoveryResult) -> Self {
        let is_synthetic = result.is_synthetic();
        let facilities = result
            .facilities
            .into_iter()
            .map(|f| FacilitySummary {
                distance_km: (f.distance_km() * 100.0).round() / 100.0,
                coordinate: f.coordinate(),
                name: f.name,
                address: f.address,
                phone: f.phone,
            })
            .collect();
        Self {
            facilities,
            outcome: result.outcome,
            is_synthetic,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchFacility {
    pub name: String,
    pub distance: String,
    pub eta: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub priority_tier: String,
    pub priority_description: String,
    pub facility: DispatchFacility,
    pub notification_url: String,
    pub tracking_url: String,
    pub is_synthetic: bool,
}

impl From<DispatchPlan> for DispatchResponse {
    fn from(plan: DispatchPlan) -> Self {
        Self {
            priority_tier: plan.priority_tier.label().to_string(),
            priority_description: plan.priority_description,
            facility: DispatchFacility {
                distance: format!("{:.2} km", plan.destination.distance_km),
                eta: format!("{} min", plan.eta_minutes),
                lat: plan.destination.coordinate.latitude(),
                lng: plan.destination.coordinate.longitude(),
                name: plan.destination.name,
            },
            notification_url: plan.notification_url,
            tracking_url: plan.tracking_url,
            is_synthetic: plan.is_synthetic,
        }
    }
}
