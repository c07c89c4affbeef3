//! Authoritative distance lookups with retry.

use tracing::warn;

use crate::error::RoutingError;
use crate::model::Coordinate;
use crate::retry::RetryPolicy;
use crate::traits::RouteDistanceProvider;

/// Wraps a single-attempt [`RouteDistanceProvider`] with a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RoutingResolver<P> {
    provider: P,
    retry: RetryPolicy,
}

impl<P: RouteDistanceProvider> RoutingResolver<P> {
    pub fn new(provider: P, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Road distance in kilometers. The error of the final attempt is
    /// returned once the policy gives up.
    ///
    /// Negative or non-finite answers from the provider count as a failed
    /// attempt with [`RoutingError::InvalidDistance`].
    pub async fn resolve(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, RoutingError> {
        let result = self
            .retry
            .run(
                |_| async move {
                    self.provider
                        .distance_km(origin, destination)
                        .await
                        .and_then(checked_km)
                },
                RoutingError::is_retryable,
            )
            .await;

        if let Err(err) = &result {
            warn!(%origin, %destination, error = %err, "route distance unavailable");
        }
        result
    }
}

fn checked_km(km: f64) -> Result<f64, RoutingError> {
    if km.is_finite() && km >= 0.0 {
        Ok(km)
    } else {
        Err(RoutingError::InvalidDistance(km))
    }
}
