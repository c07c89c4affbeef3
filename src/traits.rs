//! Seams between the dispatch engine and its external collaborators.
//!
//! Concrete backends live in their own modules; tests substitute scripted
//! implementations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{RoutingError, StoreError};
use crate::model::{Assignment, Coordinate, Customer, CustomerId, NewAssignment, Technician};

/// Provides an authoritative road-network distance between two points.
///
/// Implementations make exactly one attempt per call; retrying is the
/// caller's business.
#[async_trait]
pub trait RouteDistanceProvider: Send + Sync {
    /// Travel distance in kilometers from `origin` to `destination`.
    async fn distance_km(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, RoutingError>;
}

#[async_trait]
impl<T: RouteDistanceProvider + ?Sized> RouteDistanceProvider for Box<T> {
    async fn distance_km(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, RoutingError> {
        (**self).distance_km(origin, destination).await
    }
}

#[async_trait]
impl<T: RouteDistanceProvider + ?Sized> RouteDistanceProvider for Arc<T> {
    async fn distance_km(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, RoutingError> {
        (**self).distance_km(origin, destination).await
    }
}

/// Persistent store holding customers, technicians and assignments.
///
/// Each method is a single read or a single write; implementations must
/// not hold a connection between calls.
#[async_trait]
pub trait DispatchStore: Send + Sync {
    /// Look up a customer, failing with [`StoreError::CustomerNotFound`].
    async fn customer(&self, id: CustomerId) -> Result<Customer, StoreError>;

    /// All technicians whose active flag is set. May be empty.
    async fn active_technicians(&self) -> Result<Vec<Technician>, StoreError>;

    /// Insert a new assignment and return it with its generated identifier
    /// and timestamp.
    async fn record_assignment(&self, assignment: NewAssignment) -> Result<Assignment, StoreError>;

    /// All recorded assignments, newest first.
    async fn assignments(&self) -> Result<Vec<Assignment>, StoreError>;

    /// Trivial round trip used as a liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: DispatchStore + ?Sized> DispatchStore for Arc<T> {
    async fn customer(&self, id: CustomerId) -> Result<Customer, StoreError> {
        (**self).customer(id).await
    }

    async fn active_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        (**self).active_technicians().await
    }

    async fn record_assignment(&self, assignment: NewAssignment) -> Result<Assignment, StoreError> {
        (**self).record_assignment(assignment).await
    }

    async fn assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        (**self).assignments().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}
