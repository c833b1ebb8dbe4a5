//! Precision filter for provider listings. The broad healthcare categories
//! are noisy, so this may reject every candidate in a tier; escalating to
//! another tier is the finder's call, not this module's.

use std::collections::BTreeSet;

const HOSPITAL_MARKERS: [&str; 4] = ["hospital", "medical center", "medical centre", "nursing home"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    DentalName,
    VeterinaryName,
    GenericClinic,
    ExcludedCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Rules are checked in order and the first match wins. `name` is lower-cased here.
pub fn classify(name: &str, categories: &BTreeSet<String>) -> Verdict {
    let name = name.to_lowercase();

    if name.contains("dental") || name.contains("dentist") {
        return Verdict::Rejected(RejectReason::DentalName);
    }
    if name.contains("veterinary") || name.contains("animal") {
        return Verdict::Rejected(RejectReason::VeterinaryName);
    }
    if name.contains("clinic") && !HOSPITAL_MARKERS.iter().any(|m| name.contains(m)) {
        return Verdict::Rejected(RejectReason::GenericClinic);
    }
    if categories
        .iter()
        .any(|c| c.contains("dentist") || c.contains("veterinary"))
    {
        return Verdict::Rejected(RejectReason::ExcludedCategory);
    }

    Verdict::Accepted
}
