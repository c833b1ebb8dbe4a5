use crate::core::classifier::{classify, Verdict};
use crate::core::mock::MockFacilityGenerator;
use crate::domain::model::{
    CategoryTier, Coordinate, DiscoverQuery, DiscoveryOutcome, DiscoveryResult,
    FacilityCandidate, FallbackReason, PlaceRecord, SearchRequest,
};
use crate::domain::ports::{ConfigProvider, PlacesProvider};

#[derive(Debug, Clone)]
pub struct FinderSettings {
    pub radius_meters: u32,
    pub default_limit: usize,
    pub max_limit: usize,
    pub parallel_tiers: bool,
    pub default_coordinate: Coordinate,
}

impl FinderSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            radius_meters: config.search_radius_meters(),
            default_limit: config.default_limit(),
            max_limit: config.max_limit(),
            parallel_tiers: config.parallel_tiers(),
            default_coordinate: config.default_coordinate(),
        }
    }

    /// The caller's own cap, if it gave one; 0 counts as absent.
    fn explicit_limit(&self, limit: Option<usize>) -> Option<usize> {
        limit.filter(|n| *n > 0).map(|n| n.min(self.max_limit))
    }

    fn resolve_limit(&self, limit: Option<usize>) -> usize {
        self.explicit_limit(limit).unwrap_or(self.default_limit)
    }

    fn resolve_radius(&self, radius: Option<u32>) -> u32 {
        radius.filter(|r| *r > 0).unwrap_or(self.radius_meters)
    }
}

/// Two-tier facility search with a synthetic fallback for unconfigured or
/// invalid calls.
pub struct FacilityFinder<P: PlacesProvider> {
    provider: P,
    mock: MockFacilityGenerator,
    settings: FinderSettings,
}

impl<P: PlacesProvider> FacilityFinder<P> {
    pub fn new(provider: P, mock: MockFacilityGenerator, settings: FinderSettings) -> Self {
        Self {
            provider,
            mock,
            settings,
        }
    }

    pub fn settings(&self) -> &FinderSettings {
        &self.settings
    }

    pub async fn discover(&self, query: &DiscoverQuery) -> DiscoveryResult {
        let limit = self.settings.resolve_limit(query.limit);
        // synthetic output is the full mock set unless the caller capped it
        let synthetic_cap = self.settings.explicit_limit(query.limit);

        let center = match Coordinate::from_parts(query.latitude, query.longitude) {
            Ok(center) => center,
            Err(e) => {
                tracing::warn!("{}; using default coordinate for synthetic results", e);
                return self.synthetic(
                    self.settings.default_coordinate,
                    synthetic_cap,
                    FallbackReason::InvalidInput,
                );
            }
        };

        if !self.provider.has_credential() {
            tracing::info!("No places provider credential configured, returning synthetic facilities");
            return self.synthetic(center, synthetic_cap, FallbackReason::MissingCredential);
        }

        let radius_meters = self.settings.resolve_radius(query.radius);
        let request = |tier: CategoryTier| SearchRequest {
            center,
            radius_meters,
            category_tier: tier,
            result_cap: limit,
        };
        let specific = request(CategoryTier::Specific);
        let broad = request(CategoryTier::Broad);

        let (tier, mut accepted) = if self.settings.parallel_tiers {
            let (specific_raw, broad_raw) =
                tokio::join!(self.provider.search(&specific), self.provider.search(&broad));
            let specific_hits = self.accept(&center, specific_raw, CategoryTier::Specific);
            if specific_hits.is_empty() {
                (CategoryTier::Broad, self.accept(&center, broad_raw, CategoryTier::Broad))
            } else {
                (CategoryTier::Specific, specific_hits)
            }
        } else {
            let specific_raw = self.provider.search(&specific).await;
            let specific_hits = self.accept(&center, specific_raw, CategoryTier::Specific);
            if specific_hits.is_empty() {
                tracing::info!("No hospitals left after filtering, trying broader healthcare category");
                let broad_raw = self.provider.search(&broad).await;
                (CategoryTier::Broad, self.accept(&center, broad_raw, CategoryTier::Broad))
            } else {
                (CategoryTier::Specific, specific_hits)
            }
        };

        if accepted.is_empty() {
            tracing::info!("No facilities found within {} m of the caller", radius_meters);
            return DiscoveryResult {
                origin: center,
                facilities: accepted,
                outcome: DiscoveryOutcome::NoCoverage,
            };
        }

        rank(&mut accepted, limit);
        if let Some(top) = accepted.first() {
            tracing::info!("Top facility found: {} at {:.2} km", top.name, top.distance_km());
        }

        DiscoveryResult {
            origin: center,
            facilities: accepted,
            outcome: DiscoveryOutcome::Ranked { tier },
        }
    }

    fn accept(
        &self,
        center: &Coordinate,
        raw: Vec<PlaceRecord>,
        tier: CategoryTier,
    ) -> Vec<FacilityCandidate> {
        let total = raw.len();
        // 只判斷供應商給的名稱；地址只用於顯示
        let accepted: Vec<FacilityCandidate> = raw
            .into_iter()
            .filter(|place| {
                let name = place.name.as_deref().unwrap_or("");
                match classify(name, &place.categories) {
                    Verdict::Accepted => true,
                    Verdict::Rejected(reason) => {
                        tracing::debug!("Rejected '{}': {:?}", name, reason);
                        false
                    }
                }
            })
            .map(|place| FacilityCandidate::from_place(place, center))
            .collect();

        tracing::debug!(
            "Tier '{}': {} of {} candidates accepted",
            tier.category(),
            accepted.len(),
            total
        );
        accepted
    }

    fn synthetic(
        &self,
        center: Coordinate,
        cap: Option<usize>,
        reason: FallbackReason,
    ) -> DiscoveryResult {
        let mut facilities = self.mock.generate(&center);
        if let Some(cap) = cap {
            facilities.truncate(cap);
        }
        DiscoveryResult {
            origin: center,
            facilities,
            outcome: DiscoveryOutcome::Synthetic { reason },
        }
    }
}

/// Stable ascending sort by distance, then truncate.
pub fn rank(candidates: &mut Vec<FacilityCandidate>, limit: usize) {
    candidates.sort_by(|a, b| a.distance_km().total_cmp(&b.distance_km()));
    candidates.truncate(limit);
}
