use crate::core::geo;
use crate::domain::model::{
    Coordinate, Destination, DiscoveryResult, DispatchPlan, FacilityCandidate, PriorityTier,
};
use crate::domain::ports::ConfigProvider;
use url::form_urlencoded;

pub const MINUTES_PER_KM: f64 = 3.0;
pub const DISPATCH_OVERHEAD_MINUTES: u32 = 5;

/// Offset of the placeholder destination from the caller, in degrees.
const PLACEHOLDER_OFFSET_DEG: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub notification_base_url: String,
    pub notification_phone: String,
    pub tracking_path: String,
    pub placeholder_facility: String,
}

impl DispatchSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            notification_base_url: config.notification_base_url().to_string(),
            notification_phone: config.notification_phone().to_string(),
            tracking_path: config.tracking_path().to_string(),
            placeholder_facility: config.placeholder_facility().to_string(),
        }
    }
}

/// 3 min/km travel plus a fixed dispatch overhead; not a routing estimate.
pub fn estimate_eta_minutes(distance_km: f64) -> u32 {
    (distance_km.max(0.0) * MINUTES_PER_KM).round() as u32 + DISPATCH_OVERHEAD_MINUTES
}

pub struct DispatchPlanner {
    settings: DispatchSettings,
}

impl DispatchPlanner {
    pub fn new(settings: DispatchSettings) -> Self {
        Self { settings }
    }

    /// Builds a plan from a ranked discovery result. Synthetic facilities are
    /// never routed to; the named placeholder is used instead.
    pub fn plan(&self, discovery: &DiscoveryResult) -> DispatchPlan {
        let origin = discovery.origin;
        let facility: Option<FacilityCandidate> = if discovery.is_synthetic() {
            None
        } else {
            discovery.facilities.first().cloned()
        };

        let destination = match &facility {
            Some(f) => Destination {
                name: f.name.clone(),
                coordinate: f.coordinate(),
                distance_km: f.distance_km(),
            },
            None => self.placeholder(&origin),
        };

        // triage is out of scope; every request is treated as maximum urgency
        let priority_tier = PriorityTier::P1;
        let eta_minutes = estimate_eta_minutes(destination.distance_km);

        tracing::info!(
            "Dispatch planned to {} ({:.2} km, ETA {} min)",
            destination.name,
            destination.distance_km,
            eta_minutes
        );

        DispatchPlan {
            priority_tier,
            priority_description: priority_tier.description().to_string(),
            notification_url: self.notification_url(priority_tier, &origin, &destination, eta_minutes),
            tracking_url: self.tracking_url(&origin, &destination),
            facility,
            destination,
            eta_minutes,
            is_synthetic: discovery.is_synthetic(),
        }
    }

    fn placeholder(&self, origin: &Coordinate) -> Destination {
        let lat = (origin.latitude() + PLACEHOLDER_OFFSET_DEG).min(90.0);
        let lon = origin.longitude() + PLACEHOLDER_OFFSET_DEG;
        let lon = if lon > 180.0 { lon - 360.0 } else { lon };
        let coordinate = Coordinate::new(lat, lon).unwrap_or(*origin);
        Destination {
            name: self.settings.placeholder_facility.clone(),
            coordinate,
            distance_km: geo::distance_km(origin, &coordinate),
        }
    }

    fn notification_url(
        &self,
        priority: PriorityTier,
        origin: &Coordinate,
        destination: &Destination,
        eta_minutes: u32,
    ) -> String {
        let message = format!(
            "*EMERGENCY AMBULANCE REQUEST*\n\
             Priority: {} ({})\n\
             Location: https://www.google.com/maps?q={},{}\n\
             Destination: {} (ETA: {} min)\n",
            priority.label(),
            priority.description(),
            origin.latitude(),
            origin.longitude(),
            destination.name,
            eta_minutes,
        );
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("phone", &self.settings.notification_phone)
            .append_pair("text", &message)
            .finish();
        format!("{}?{}", self.settings.notification_base_url, query)
    }

    fn tracking_url(&self, origin: &Coordinate, destination: &Destination) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("lat", &origin.latitude().to_string())
            .append_pair("lng", &origin.longitude().to_string())
            .append_pair("hospital", &destination.name)
            .append_pair("h_lat", &destination.coordinate.latitude().to_string())
            .append_pair("h_lng", &destination.coordinate.longitude().to_string())
            .finish();
        format!("{}?{}", self.settings.tracking_path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CategoryTier, DiscoveryOutcome, FallbackReason};
    use std::collections::BTreeSet;
    use url::Url;

    fn planner() -> DispatchPlanner {
        DispatchPlanner::new(DispatchSettings {
            notification_base_url: "https://api.whatsapp.com/send".to_string(),
            notification_phone: "15550100".to_string(),
            tracking_path: "/ambulance/tracking".to_string(),
            placeholder_facility: "City Cancer Center".to_string(),
        })
    }

    fn discovery(facilities: Vec<FacilityCandidate>, outcome: DiscoveryOutcome) -> DiscoveryResult {
        DiscoveryResult {
            origin: Coordinate::new(0.0, 0.0).unwrap(),
            facilities,
            outcome,
        }
    }

    fn candidate(name: &str, lat: f64) -> FacilityCandidate {
        let origin = Coordinate::new(0.0, 0.0).unwrap();
        FacilityCandidate::new(
            name.to_string(),
            None,
            None,
            BTreeSet::new(),
            Coordinate::new(lat, 0.0).unwrap(),
            &origin,
        )
    }

    fn query_pairs(url: &str) -> Vec<(String, String)> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_eta_formula() {
        assert_eq!(estimate_eta_minutes(10.0), 35);
        assert_eq!(estimate_eta_minutes(0.0), 5);
        assert_eq!(estimate_eta_minutes(2.9), 14);
        assert_eq!(estimate_eta_minutes(2.4), 12);
    }

    #[test]
    fn test_plan_uses_top_candidate() {
        // 10 km due north of the origin
        let lat = 10.0 / geo::EARTH_RADIUS_KM * 180.0 / std::f64::consts::PI;
        let result = discovery(
            vec![candidate("St. Anne's Hospital", lat), candidate("Far Hospital", 0.5)],
            DiscoveryOutcome::Ranked {
                tier: CategoryTier::Specific,
            },
        );

        let plan = planner().plan(&result);

        assert_eq!(plan.priority_tier, PriorityTier::P1);
        assert_eq!(plan.priority_description, "Life-threatening (High Risk)");
        assert_eq!(plan.eta_minutes, 35);
        assert_eq!(plan.destination.name, "St. Anne's Hospital");
        assert_eq!(plan.facility.as_ref().map(|f| f.name.as_str()), Some("St. Anne's Hospital"));
        assert!(!plan.is_synthetic);
    }

    #[test]
    fn test_plan_without_candidates_uses_placeholder() {
        let plan = planner().plan(&discovery(vec![], DiscoveryOutcome::NoCoverage));

        assert!(plan.facility.is_none());
        assert_eq!(plan.destination.name, "City Cancer Center");
        assert_eq!(plan.destination.coordinate.latitude(), 0.01);
        assert_eq!(plan.destination.coordinate.longitude(), 0.01);
        // ~1.57 km away
        assert_eq!(plan.eta_minutes, 10);
    }

    #[test]
    fn test_synthetic_facilities_are_not_routed_to() {
        let result = discovery(
            vec![candidate("City General Hospital", 0.02)],
            DiscoveryOutcome::Synthetic {
                reason: FallbackReason::MissingCredential,
            },
        );

        let plan = planner().plan(&result);

        assert!(plan.facility.is_none());
        assert_eq!(plan.destination.name, "City Cancer Center");
        assert!(plan.is_synthetic);
    }

    #[test]
    fn test_notification_url_escapes_message() {
        let result = discovery(
            vec![candidate("Mercy Hospital & Trauma", 0.05)],
            DiscoveryOutcome::Ranked {
                tier: CategoryTier::Broad,
            },
        );
        let plan = planner().plan(&result);

        assert!(plan.notification_url.starts_with("https://api.whatsapp.com/send?phone=15550100&text="));
        assert!(!plan.notification_url.contains(' '));
        assert!(!plan.notification_url.contains('\n'));

        let pairs = query_pairs(&plan.notification_url);
        assert_eq!(pairs[0], ("phone".to_string(), "15550100".to_string()));
        let text = &pairs[1].1;
        assert!(text.starts_with("*EMERGENCY AMBULANCE REQUEST*\nPriority: Priority 1"));
        assert!(text.contains("Destination: Mercy Hospital & Trauma (ETA: 22 min)"));
        assert!(text.contains("https://www.google.com/maps?q=0,0"));
    }

    #[test]
    fn test_plan_is_repeatable() {
        let result = discovery(
            vec![candidate("Mercy Hospital & Trauma", 0.05)],
            DiscoveryOutcome::Ranked {
                tier: CategoryTier::Specific,
            },
        );
        let planner = planner();

        let first = planner.plan(&result);
        let second = planner.plan(&result);

        assert_eq!(first, second);
        let text = &query_pairs(&first.notification_url)[1].1;
        assert!(text.ends_with("Destination: Mercy Hospital & Trauma (ETA: 22 min)\n"));
    }

    #[test]
    fn test_tracking_url_carries_both_points() {
        let result = discovery(
            vec![candidate("Mercy Hospital & Trauma", 0.05)],
            DiscoveryOutcome::Ranked {
                tier: CategoryTier::Specific,
            },
        );
        let plan = planner().plan(&result);

        assert!(plan.tracking_url.starts_with("/ambulance/tracking?lat=0&lng=0&hospital=Mercy+Hospital+%26+Trauma"));
        let pairs = query_pairs(&format!("http://localhost{}", plan.tracking_url));
        assert_eq!(
            pairs,
            vec![
                ("lat".to_string(), "0".to_string()),
                ("lng".to_string(), "0".to_string()),
                ("hospital".to_string(), "Mercy Hospital & Trauma".to_string()),
                ("h_lat".to_string(), "0.05".to_string()),
                ("h_lng".to_string(), "0".to_string()),
            ]
        );
    }
}
