//! Picks the winning technician from resolution outcomes.

use crate::model::{ResolutionOutcome, TechnicianId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub technician_id: TechnicianId,
    pub distance_km: f64,
}

/// The resolved outcome with the smallest distance.
///
/// Equal distances go to the better shortlist rank, whatever order the
/// outcomes arrive in. Returns `None` when nothing resolved.
pub fn pick_best(outcomes: &[ResolutionOutcome]) -> Option<Decision> {
    outcomes
        .iter()
        .filter_map(|outcome| match &outcome.distance_km {
            Ok(distance_km) => Some((*distance_km, outcome.rank, outcome.technician_id)),
            Err(_) => None,
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(distance_km, _, technician_id)| Decision {
            technician_id,
            distance_km,
        })
}
