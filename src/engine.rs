//! The dispatch call: shortlist, resolve, decide, record.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::coordinator::resolve_all;
use crate::decision::pick_best;
use crate::error::DispatchError;
use crate::model::{Assignment, CustomerId, NewAssignment};
use crate::resolver::RoutingResolver;
use crate::retry::RetryPolicy;
use crate::shortlist::{DEFAULT_SHORTLIST_SIZE, shortlist};
use crate::traits::{DispatchStore, RouteDistanceProvider};

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOptions {
    /// Number of geometrically closest technicians sent to routing.
    pub shortlist_size: usize,
    /// Stop waiting for routing after this long and decide with what
    /// resolved. `None` waits for every candidate to settle.
    pub resolution_deadline: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
            resolution_deadline: None,
        }
    }
}

/// Assigns customers to technicians.
///
/// Holds no per-call state; one engine can serve concurrent dispatch calls.
pub struct DispatchEngine<S, P> {
    store: S,
    resolver: RoutingResolver<P>,
    options: DispatchOptions,
}

impl<S, P> DispatchEngine<S, P>
where
    S: DispatchStore,
    P: RouteDistanceProvider,
{
    pub fn new(store: S, provider: P, retry: RetryPolicy, options: DispatchOptions) -> Self {
        Self {
            store,
            resolver: RoutingResolver::new(provider, retry),
            options,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Pick the technician with the shortest road distance to the customer
    /// and record the assignment.
    #[instrument(skip_all, fields(customer = %customer_id))]
    pub async fn dispatch(&self, customer_id: CustomerId) -> Result<Assignment, DispatchError> {
        let customer = self.store.customer(customer_id).await?;

        let technicians = self
            .store
            .active_technicians()
            .await
            .map_err(DispatchError::PersistenceFailure)?;

        let candidates = shortlist(
            customer.location,
            &technicians,
            self.options.shortlist_size.max(1),
        );
        if candidates.is_empty() {
            return Err(DispatchError::NoTechniciansAvailable);
        }
        debug!(
            fleet = technicians.len(),
            shortlisted = candidates.len(),
            "shortlist ready"
        );

        let outcomes = resolve_all(
            &self.resolver,
            customer.location,
            &candidates,
            candidates.len(),
            self.options.resolution_deadline,
        )
        .await;

        let decision = pick_best(&outcomes).ok_or(DispatchError::NoResolvableTechnician {
            attempted: outcomes.len(),
        })?;

        let assignment = self
            .store
            .record_assignment(NewAssignment {
                customer_id,
                technician_id: decision.technician_id,
                distance_km: decision.distance_km,
            })
            .await
            .map_err(DispatchError::PersistenceFailure)?;

        info!(
            assignment = %assignment.id,
            technician = %assignment.technician_id,
            distance_km = assignment.distance_km,
            "technician assigned"
        );
        Ok(assignment)
    }
}
