//! Error taxonomy for routing, storage and the dispatch call itself.

use thiserror::Error;

use crate::model::CustomerId;

/// Failure of a single authoritative distance attempt.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("routing request timed out")]
    Timeout,

    #[error("routing service returned status {status}")]
    Status { status: u16 },

    #[error("routing response contained no route")]
    NoRoute,

    #[error("routing response is missing the route distance")]
    MissingDistance,

    #[error("routing response carried an unusable distance: {0}")]
    InvalidDistance(f64),

    #[error("routing response could not be decoded: {0}")]
    Decode(String),

    #[error("routing request could not be built: {0}")]
    InvalidRequest(String),

    #[error("dispatch deadline elapsed before the route resolved")]
    DeadlineElapsed,
}

impl RoutingError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            RoutingError::InvalidRequest(_) | RoutingError::DeadlineElapsed
        )
    }
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RoutingError::Timeout
        } else if let Some(status) = err.status() {
            RoutingError::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            RoutingError::Decode(err.to_string())
        } else if err.is_builder() {
            RoutingError::InvalidRequest(err.to_string())
        } else {
            RoutingError::Transport(err)
        }
    }
}

/// Failure reported by a [`DispatchStore`](crate::traits::DispatchStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Call-level outcome of a failed dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("no technicians available")]
    NoTechniciansAvailable,

    #[error("unable to compute driving distances for any of {attempted} candidates")]
    NoResolvableTechnician { attempted: usize },

    #[error("persistence failure: {0}")]
    PersistenceFailure(#[source] StoreError),
}

impl DispatchError {
    /// Stable machine-readable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::CustomerNotFound(_) => "customer_not_found",
            DispatchError::NoTechniciansAvailable => "no_technicians_available",
            DispatchError::NoResolvableTechnician { .. } => "no_resolvable_technician",
            DispatchError::PersistenceFailure(_) => "persistence_failure",
        }
    }

    /// HTTP status a request layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            DispatchError::CustomerNotFound(_) => 404,
            DispatchError::NoTechniciansAvailable => 503,
            DispatchError::NoResolvableTechnician { .. } => 503,
            DispatchError::PersistenceFailure(_) => 500,
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CustomerNotFound(id) => DispatchError::CustomerNotFound(id),
            other => DispatchError::PersistenceFailure(other),
        }
    }
}

/// Invalid or missing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
