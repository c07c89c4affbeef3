//! tech-dispatch
//!
//! Assigns a customer to the technician with the shortest road distance.
//! A great-circle estimate narrows the fleet to a shortlist, an external
//! routing service resolves real distances for that shortlist concurrently,
//! and the winner is recorded as an assignment.

pub mod config;
pub mod coordinator;
pub mod decision;
pub mod engine;
pub mod error;
pub mod haversine;
pub mod memory_store;
pub mod model;
pub mod ors;
pub mod osrm;
pub mod postgres_store;
pub mod resolver;
pub mod retry;
pub mod shortlist;
pub mod traits;

pub use engine::{DispatchEngine, DispatchOptions};
pub use error::{DispatchError, RoutingError, StoreError};
pub use model::{Assignment, Coordinate, CustomerId, TechnicianId};
