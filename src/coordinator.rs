//! Concurrent resolution of a shortlist.
//!
//! Every candidate is resolved independently; a failure on one never
//! cancels another. Outcomes are matched back to candidates by technician
//! id, so completion order does not matter.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::model::{Candidate, Coordinate, ResolutionOutcome, TechnicianId};
use crate::resolver::RoutingResolver;
use crate::traits::RouteDistanceProvider;

/// Resolve authoritative distances from `origin` to every candidate.
///
/// At most `max_in_flight` resolver calls run at once. With a `deadline`,
/// candidates still pending when it elapses are reported as
/// [`RoutingError::DeadlineElapsed`]. A technician listed more than once is
/// resolved once, under its best rank. The result has one outcome per
/// distinct technician, in shortlist order.
pub async fn resolve_all<P: RouteDistanceProvider>(
    resolver: &RoutingResolver<P>,
    origin: Coordinate,
    candidates: &[Candidate],
    max_in_flight: usize,
    deadline: Option<Duration>,
) -> Vec<ResolutionOutcome> {
    let mut seen = HashSet::with_capacity(candidates.len());
    let unique: Vec<&Candidate> = candidates
        .iter()
        .filter(|candidate| seen.insert(candidate.technician_id))
        .collect();

    let mut pending = stream::iter(unique.iter().copied())
        .map(|candidate| async move {
            let distance = resolver.resolve(origin, candidate.location).await;
            (candidate.technician_id, distance)
        })
        .buffer_unordered(max_in_flight.max(1));

    let mut settled: HashMap<TechnicianId, Result<f64, RoutingError>> =
        HashMap::with_capacity(unique.len());

    // A deadline too far out to represent as an instant never fires.
    let expires = deadline.and_then(|limit| tokio::time::Instant::now().checked_add(limit));

    match expires {
        None => {
            while let Some((technician_id, distance)) = pending.next().await {
                settled.insert(technician_id, distance);
            }
        }
        Some(expires) => {
            loop {
                match tokio::time::timeout_at(expires, pending.next()).await {
                    Ok(Some((technician_id, distance))) => {
                        settled.insert(technician_id, distance);
                    }
                    Ok(None) => break,
                    Err(_) => {
                        warn!(
                            settled = settled.len(),
                            candidates = unique.len(),
                            "dispatch deadline elapsed with routes still pending"
                        );
                        break;
                    }
                }
            }
        }
    }
    // Anything still in flight past the deadline is abandoned here.
    drop(pending);

    let outcomes: Vec<ResolutionOutcome> = unique
        .into_iter()
        .map(|candidate| ResolutionOutcome {
            technician_id: candidate.technician_id,
            rank: candidate.rank,
            distance_km: settled
                .remove(&candidate.technician_id)
                .unwrap_or(Err(RoutingError::DeadlineElapsed)),
        })
        .collect();

    debug!(
        resolved = outcomes.iter().filter(|o| o.is_resolved()).count(),
        total = outcomes.len(),
        "shortlist resolution settled"
    );
    outcomes
}
