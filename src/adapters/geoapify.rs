use crate::domain::model::{Coordinate, PlaceRecord, SearchRequest};
use crate::domain::ports::PlacesProvider;
use crate::utils::error::{LocatorError, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.geoapify.com/v2/places";
pub const MIN_OVERFETCH_MULTIPLIER: usize = 20;
pub const OVERFETCH_FLOOR: usize = 100;

const USER_AGENT: &str = concat!("care-locator/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    name: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    formatted: Option<String>,
    address_line1: Option<String>,
    address_line2: Option<String>,
    phone: Option<String>,
    contact: Option<Contact>,
}

#[derive(Debug, Deserialize)]
struct Contact {
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

impl Feature {
    /// Features without a usable `[lon, lat]` point are dropped here.
    fn into_place(self) -> Option<PlaceRecord> {
        let coords = self.geometry?.coordinates;
        if coords.len() < 2 {
            return None;
        }
        let coordinate = Coordinate::new(coords[1], coords[0]).ok()?;

        let props = self.properties;
        let address = props.formatted.or_else(|| match (props.address_line1, props.address_line2) {
            (Some(l1), Some(l2)) => Some(format!("{}, {}", l1, l2)),
            (l1, l2) => l1.or(l2),
        });
        let phone = props.phone.or_else(|| props.contact.and_then(|c| c.phone));

        Some(PlaceRecord {
            name: props.name,
            address,
            phone,
            categories: props.categories.into_iter().collect::<BTreeSet<_>>(),
            coordinate,
        })
    }
}

/// Client for the Geoapify Places API. One instance is built at startup and
/// shared for the life of the process.
#[derive(Debug, Clone)]
pub struct GeoapifyClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    overfetch_multiplier: usize,
    retry_transport_errors: bool,
}

impl GeoapifyClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(client, endpoint, api_key))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            overfetch_multiplier: MIN_OVERFETCH_MULTIPLIER,
            retry_transport_errors: false,
        }
    }

    pub fn with_overfetch_multiplier(mut self, multiplier: usize) -> Self {
        self.overfetch_multiplier = multiplier.max(MIN_OVERFETCH_MULTIPLIER);
        self
    }

    pub fn with_transport_retry(mut self, enabled: bool) -> Self {
        self.retry_transport_errors = enabled;
        self
    }

    /// Number of raw places requested for a caller cap; the classifier
    /// discards a large share of them.
    pub fn fetch_limit(&self, result_cap: usize) -> usize {
        result_cap
            .saturating_mul(self.overfetch_multiplier)
            .max(OVERFETCH_FLOOR)
    }

    async fn fetch(&self, request: &SearchRequest, api_key: &str) -> Result<Vec<PlaceRecord>> {
        let center = request.center;
        let filter = format!(
            "circle:{},{},{}",
            center.longitude(),
            center.latitude(),
            request.radius_meters
        );
        let bias = format!("proximity:{},{}", center.longitude(), center.latitude());
        let limit = self.fetch_limit(request.result_cap).to_string();

        tracing::debug!(
            "Querying places provider: categories={} filter={} limit={}",
            request.category_tier.category(),
            filter,
            limit
        );

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("categories", request.category_tier.category()),
                ("filter", filter.as_str()),
                ("bias", bias.as_str()),
                ("limit", limit.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocatorError::ProviderStatusError {
                status: status.as_u16(),
            });
        }

        let collection: FeatureCollection = response.json().await?;
        let total = collection.features.len();
        let places: Vec<PlaceRecord> = collection
            .features
            .into_iter()
            .filter_map(Feature::into_place)
            .collect();

        if places.len() < total {
            tracing::debug!(
                "Dropped {} features without usable geometry",
                total - places.len()
            );
        }
        Ok(places)
    }
}

#[async_trait]
impl PlacesProvider for GeoapifyClient {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, request: &SearchRequest) -> Vec<PlaceRecord> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Vec::new();
        };

        let mut result = self.fetch(request, api_key).await;

        let should_retry =
            matches!(&result, Err(e) if self.retry_transport_errors && e.is_transport());
        if should_retry {
            let jitter: u64 = rand::rng().random_range(100..400);
            tracing::info!("Transport error, retrying places search once in {} ms", jitter);
            tokio::time::sleep(Duration::from_millis(jitter)).await;
            result = self.fetch(request, api_key).await;
        }

        match result {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(
                    "Places search for '{}' failed: {}",
                    request.category_tier.category(),
                    e
                );
                Vec::new()
            }
        }
    }
}
