use care_locator::domain::model::{CategoryTier, FallbackReason};
use care_locator::{DiscoverQuery, DiscoveryOutcome, LocatorEngine, TomlConfig};
use httpmock::prelude::*;
use serde_json::{json, Value};

fn feature(name: &str, categories: &[&str], lat: f64, lon: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "name": name,
            "categories": categories,
            "formatted": format!("{}, Springfield", name),
        },
        "geometry": {"type": "Point", "coordinates": [lon, lat]}
    })
}

fn configured(server: &MockServer) -> TomlConfig {
    TomlConfig::from_toml_str(&format!(
        r#"
[provider]
endpoint = "{}"
api_key = "test-key"
timeout_seconds = 5
"#,
        server.url("/v2/places")
    ))
    .unwrap()
}

fn query(limit: Option<usize>) -> DiscoverQuery {
    DiscoverQuery {
        latitude: Some(12.97),
        longitude: Some(77.59),
        radius: None,
        limit,
    }
}

#[tokio::test]
async fn test_specific_tier_results_are_filtered_and_ranked() {
    let server = MockServer::start();
    let specific = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/places")
            .query_param("categories", "healthcare.hospital")
            .query_param("apiKey", "test-key");
        then.status(200).json_body(json!({
            "type": "FeatureCollection",
            "features": [
                feature("Manipal Hospital", &["healthcare.hospital"], 12.96, 77.65),
                feature("Smile Dental Clinic", &["healthcare.dentist"], 12.971, 77.591),
                feature("Bowring Hospital", &["healthcare.hospital"], 12.98, 77.60),
                feature("Happy Paws Animal Hospital", &["healthcare.hospital"], 12.972, 77.592),
                feature("Koramangala Family Clinic", &["healthcare.hospital"], 12.973, 77.593),
            ]
        }));
    });
    let broad = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/places")
            .query_param("categories", "healthcare");
        then.status(200).json_body(json!({"features": []}));
    });

    let engine = LocatorEngine::from_config(&configured(&server)).unwrap();
    let result = engine.discover(&query(None)).await;

    specific.assert();
    broad.assert_hits(0);
    assert_eq!(
        result.outcome,
        DiscoveryOutcome::Ranked {
            tier: CategoryTier::Specific
        }
    );
    let names: Vec<&str> = result.facilities.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Bowring Hospital", "Manipal Hospital"]);
    assert!(!result.is_synthetic());
}

#[tokio::test]
async fn test_broad_tier_used_when_specific_tier_is_all_noise() {
    let server = MockServer::start();
    let specific = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/places")
            .query_param("categories", "healthcare.hospital");
        then.status(200).json_body(json!({
            "features": [
                feature("Downtown Family Clinic", &["healthcare.clinic_or_praxis"], 12.971, 77.591),
                feature("City Dental Clinic", &["healthcare.dentist"], 12.972, 77.592),
            ]
        }));
    });
    let broad = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/places")
            .query_param("categories", "healthcare");
        then.status(200).json_body(json!({
            "features": [
                feature("Westside Medical Center", &["healthcare"], 13.0, 77.6),
                feature("Sunrise Nursing Home", &["healthcare"], 12.99, 77.6),
            ]
        }));
    });

    let engine = LocatorEngine::from_config(&configured(&server)).unwrap();
    let result = engine.discover(&query(None)).await;

    specific.assert();
    broad.assert();
    assert_eq!(
        result.outcome,
        DiscoveryOutcome::Ranked {
            tier: CategoryTier::Broad
        }
    );
    assert_eq!(result.facilities.len(), 2);
    assert_eq!(result.facilities[0].name, "Sunrise Nursing Home");
}

#[tokio::test]
async fn test_provider_errors_are_no_coverage_not_synthetic() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v2/places");
        then.status(500);
    });

    let engine = LocatorEngine::from_config(&configured(&server)).unwrap();
    let result = engine.discover(&query(None)).await;

    // one request per tier, no retries
    api_mock.assert_hits(2);
    assert_eq!(result.outcome, DiscoveryOutcome::NoCoverage);
    assert!(result.facilities.is_empty());
    assert!(!result.is_synthetic());
}

#[tokio::test]
async fn test_missing_credential_returns_mock_count_capped_at_limit() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v2/places");
        then.status(200).json_body(json!({"features": []}));
    });
    let config = TomlConfig::from_toml_str(&format!(
        r#"
[provider]
endpoint = "{}"
api_key = "${{CARE_LOCATOR_UNSET_KEY_FOR_TESTS}}"

[fallback]
mock_count = 12
mock_seed = 99
"#,
        server.url("/v2/places")
    ))
    .unwrap();

    let engine = LocatorEngine::from_config(&config).unwrap();

    let all = engine.discover(&query(Some(50))).await;
    assert_eq!(all.facilities.len(), 12);
    assert_eq!(
        all.outcome,
        DiscoveryOutcome::Synthetic {
            reason: FallbackReason::MissingCredential
        }
    );
    for pair in all.facilities.windows(2) {
        assert!(pair[0].distance_km() <= pair[1].distance_km());
    }

    let unlimited = engine.discover(&query(None)).await;
    assert_eq!(unlimited.facilities.len(), 12);

    let capped = engine.discover(&query(Some(4))).await;
    assert_eq!(capped.facilities.len(), 4);
    assert_eq!(capped.facilities[..], all.facilities[..4]);

    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_unnamed_hospital_is_kept_under_its_address() {
    let server = MockServer::start();
    let specific = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/places")
            .query_param("categories", "healthcare.hospital");
        then.status(200).json_body(json!({
            "features": [{
                "type": "Feature",
                "properties": {
                    "categories": ["healthcare.hospital"],
                    "formatted": "1 Clinic Road, Springfield"
                },
                "geometry": {"type": "Point", "coordinates": [77.6, 12.98]}
            }]
        }));
    });

    let engine = LocatorEngine::from_config(&configured(&server)).unwrap();
    let result = engine.discover(&query(None)).await;

    specific.assert();
    assert_eq!(
        result.outcome,
        DiscoveryOutcome::Ranked {
            tier: CategoryTier::Specific
        }
    );
    assert_eq!(result.facilities.len(), 1);
    assert_eq!(result.facilities[0].name, "1 Clinic Road, Springfield");
}

#[tokio::test]
async fn test_results_never_exceed_limit_and_are_sorted() {
    let server = MockServer::start();
    // provider order is deliberately not distance order
    let features: Vec<Value> = (0..40)
        .map(|i| {
            let offset = ((i * 7) % 40) as f64 * 0.002;
            feature(&format!("General Hospital {}", i), &["healthcare.hospital"], 12.97 + offset, 77.59)
        })
        .collect();
    server.mock(|when, then| {
        when.method(GET)
            .path("/v2/places")
            .query_param("categories", "healthcare.hospital")
            .query_param("limit", "140");
        then.status(200).json_body(json!({ "features": features }));
    });

    let engine = LocatorEngine::from_config(&configured(&server)).unwrap();
    let result = engine.discover(&query(Some(7))).await;

    assert_eq!(result.facilities.len(), 7);
    for pair in result.facilities.windows(2) {
        assert!(pair[0].distance_km() <= pair[1].distance_km());
    }
    assert_eq!(result.facilities[0].name, "General Hospital 0");
}

#[tokio::test]
async fn test_discover_response_shape() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/v2/places")
            .query_param("categories", "healthcare.hospital");
        then.status(200).json_body(json!({
            "features": [feature("Victoria Hospital", &["healthcare.hospital"], 12.96, 77.57)]
        }));
    });

    let engine = LocatorEngine::from_config(&configured(&server)).unwrap();
    let response = engine.discover_response(&query(None)).await;
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["is_synthetic"], false);
    assert_eq!(json["outcome"]["kind"], "ranked");
    assert_eq!(json["outcome"]["tier"], "specific");
    let facility = &json["facilities"][0];
    assert_eq!(facility["name"], "Victoria Hospital");
    assert_eq!(facility["address"], "Victoria Hospital, Springfield");
    assert_eq!(facility["phone"], Value::Null);
    assert_eq!(facility["coordinate"]["latitude"], 12.96);
    assert_eq!(facility["coordinate"]["longitude"], 77.57);
    assert!(facility["distance_km"].as_f64().unwrap() > 0.0);
}
