use crate::domain::model::{Coordinate, FacilityCandidate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

pub const MIN_MOCK_COUNT: usize = 10;

/// ±0.045° in each axis keeps every point within roughly 5 km of the center.
const MAX_OFFSET_DEG: f64 = 0.045;

const NAMES: [&str; 10] = [
    "City General Hospital",
    "Metropolitan Medical Center",
    "Community Health Center",
    "Regional Cancer Treatment Center",
    "District Hospital & Oncology",
    "Public Health Medical Center",
    "Central Clinic & Emergency Care",
    "University Medical Center",
    "General Hospital & Cancer Care",
    "Healthcare Center & Oncology",
];

const STREETS: [&str; 7] = [
    "Main St",
    "Oak Ave",
    "Pine Rd",
    "Elm St",
    "Maple Dr",
    "Hospital Rd",
    "Medical Plaza",
];

const DISTRICTS: [&str; 5] = ["Downtown", "Westside", "North Hills", "South End", "East District"];

/// Synthetic facilities shaped exactly like real finder output.
#[derive(Debug, Clone)]
pub struct MockFacilityGenerator {
    count: usize,
    seed: Option<u64>,
}

impl MockFacilityGenerator {
    pub fn new(count: usize, seed: Option<u64>) -> Self {
        Self {
            count: count.max(MIN_MOCK_COUNT),
            seed,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `count` facilities around `center`, nearest first.
    pub fn generate(&self, center: &Coordinate) -> Vec<FacilityCandidate> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut facilities: Vec<FacilityCandidate> = (0..self.count)
            .map(|_| {
                let lat = (center.latitude() + rng.random_range(-MAX_OFFSET_DEG..=MAX_OFFSET_DEG))
                    .clamp(-90.0, 90.0);
                let lon = wrap_longitude(
                    center.longitude() + rng.random_range(-MAX_OFFSET_DEG..=MAX_OFFSET_DEG),
                );
                // clamp/wrap keep both axes in range
                let coordinate = Coordinate::new(lat, lon).unwrap_or(*center);

                let name = pick(&mut rng, &NAMES).to_string();
                let address = format!(
                    "{} {}, {}",
                    rng.random_range(100..1000),
                    pick(&mut rng, &STREETS),
                    pick(&mut rng, &DISTRICTS)
                );
                let phone = format!(
                    "+1 ({}) {}-{}",
                    rng.random_range(200..1000),
                    rng.random_range(100..1000),
                    rng.random_range(1000..10000)
                );
                let categories = BTreeSet::from(["healthcare.hospital".to_string()]);

                FacilityCandidate::new(
                    name,
                    Some(address),
                    Some(phone),
                    categories,
                    coordinate,
                    center,
                )
            })
            .collect();

        facilities.sort_by(|a, b| a.distance_km().total_cmp(&b.distance_km()));
        facilities
    }
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn wrap_longitude(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}
