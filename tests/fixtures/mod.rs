//! Test fixtures for tech-dispatch.
//!
//! Provides:
//! - Real Las Vegas area locations for customers and technicians
//! - A scripted routing provider that answers per destination

#![allow(dead_code)]

pub mod las_vegas_locations;

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use tech_dispatch::model::Coordinate;
use tech_dispatch::retry::RetryPolicy;
use tech_dispatch::traits::RouteDistanceProvider;
use tech_dispatch::RoutingError;

/// How the scripted router answers for one destination.
#[derive(Debug, Clone, Copy)]
pub enum Route {
    /// Always succeed with this many kilometers.
    Km(f64),
    /// Always fail.
    Fails,
    /// Fail `failures` times, then succeed.
    Flaky { failures: usize, km: f64 },
    /// Succeed after sleeping.
    Slow { delay: Duration, km: f64 },
}

/// Routing provider whose answers are keyed by destination coordinate.
/// Unscripted destinations fail with `NoRoute`.
#[derive(Default)]
pub struct ScriptedRouter {
    routes: HashMap<(u64, u64), Route>,
    calls: Mutex<HashMap<(u64, u64), usize>>,
    total: AtomicUsize,
}

fn key(point: Coordinate) -> (u64, u64) {
    (point.lat.to_bits(), point.lng.to_bits())
}

impl ScriptedRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, destination: Coordinate, route: Route) -> Self {
        self.routes.insert(key(destination), route);
        self
    }

    /// Calls made towards `destination`.
    pub fn calls_to(&self, destination: Coordinate) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .get(&key(destination))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteDistanceProvider for ScriptedRouter {
    async fn distance_km(
        &self,
        _origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, RoutingError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        let attempt = {
            let mut calls = self.calls.lock().expect("calls lock");
            let count = calls.entry(key(destination)).or_insert(0);
            *count += 1;
            *count
        };

        match self.routes.get(&key(destination)) {
            Some(Route::Km(km)) => Ok(*km),
            Some(Route::Fails) | None => Err(RoutingError::NoRoute),
            Some(Route::Flaky { failures, km }) => {
                if attempt <= *failures {
                    Err(RoutingError::Status { status: 502 })
                } else {
                    Ok(*km)
                }
            }
            Some(Route::Slow { delay, km }) => {
                tokio::time::sleep(*delay).await;
                Ok(*km)
            }
        }
    }
}

/// Default attempt budget with millisecond backoff so suites stay fast.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(10),
        ..RetryPolicy::default()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
