//! Domain types shared by every stage of a dispatch call.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RoutingError;

/// A point on the globe in decimal degrees.
///
/// Range validation is left to whoever produces the value; the engine
/// uses coordinates as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Externally assigned customer identifier.
    CustomerId
);
id_type!(
    /// Technician identifier.
    TechnicianId
);
id_type!(
    /// Store-generated assignment identifier.
    AssignmentId
);

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub location: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Technician {
    pub id: TechnicianId,
    pub location: Coordinate,
    pub active: bool,
}

/// A technician that made the geometric shortlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub technician_id: TechnicianId,
    pub location: Coordinate,
    /// Great-circle distance to the customer in kilometers.
    pub estimate_km: f64,
    /// Zero-based shortlist position; lower is geometrically closer.
    pub rank: usize,
}

/// Result of trying to obtain an authoritative distance for one candidate.
#[derive(Debug)]
pub struct ResolutionOutcome {
    pub technician_id: TechnicianId,
    pub rank: usize,
    pub distance_km: Result<f64, RoutingError>,
}

impl ResolutionOutcome {
    pub fn is_resolved(&self) -> bool {
        self.distance_km.is_ok()
    }
}

/// The values the engine hands to the store when recording a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewAssignment {
    pub customer_id: CustomerId,
    pub technician_id: TechnicianId,
    pub distance_km: f64,
}

/// A persisted dispatch decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub customer_id: CustomerId,
    pub technician_id: TechnicianId,
    pub distance_km: f64,
    pub assigned_at: DateTime<Utc>,
}
