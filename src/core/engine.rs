use crate::adapters::geoapify::GeoapifyClient;
use crate::core::dispatch::{DispatchPlanner, DispatchSettings};
use crate::core::finder::{FacilityFinder, FinderSettings};
use crate::core::mock::MockFacilityGenerator;
use crate::domain::model::{
    DiscoverQuery, DiscoverResponse, DiscoveryResult, DispatchPlan, DispatchQuery,
    DispatchResponse,
};
use crate::domain::ports::{ConfigProvider, PlacesProvider};
use crate::utils::error::Result;

/// Entry point for the two inbound operations. Neither operation fails:
/// every call produces a well-formed response.
pub struct LocatorEngine<P: PlacesProvider> {
    finder: FacilityFinder<P>,
    planner: DispatchPlanner,
}

impl LocatorEngine<GeoapifyClient> {
    /// Builds the engine with a Geoapify client; the only fallible step is
    /// constructing the HTTP client.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = GeoapifyClient::new(
            config.api_endpoint(),
            config.api_key().map(str::to_string),
            config.request_timeout(),
        )?
        .with_overfetch_multiplier(config.overfetch_multiplier())
        .with_transport_retry(config.retry_transport_errors());

        if !client.has_credential() {
            tracing::warn!("GEOAPIFY_API_KEY not set, discovery will return synthetic facilities");
        }

        Ok(Self::with_provider(client, config))
    }
}

impl<P: PlacesProvider> LocatorEngine<P> {
    pub fn with_provider<C: ConfigProvider>(provider: P, config: &C) -> Self {
        let finder = FacilityFinder::new(
            provider,
            MockFacilityGenerator::new(config.mock_count(), config.mock_seed()),
            FinderSettings::from_config(config),
        );
        let planner = DispatchPlanner::new(DispatchSettings::from_config(config));
        Self { finder, planner }
    }

    pub async fn discover(&self, query: &DiscoverQuery) -> DiscoveryResult {
        self.finder.discover(query).await
    }

    pub async fn dispatch(&self, query: &DispatchQuery) -> DispatchPlan {
        let discovery = self
            .finder
            .discover(&DiscoverQuery {
                latitude: query.latitude,
                longitude: query.longitude,
                radius: None,
                limit: Some(1),
            })
            .await;
        self.planner.plan(&discovery)
    }

    pub async fn discover_response(&self, query: &DiscoverQuery) -> DiscoverResponse {
        self.discover(query).await.into()
    }

    pub async fn dispatch_response(&self, query: &DispatchQuery) -> DispatchResponse {
        self.dispatch(query).await.into()
    }
}
