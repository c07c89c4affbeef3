//! Configuration values handed to constructors at startup.
//!
//! Nothing else in the crate reads the process environment; `from_env` is
//! the single place where variables are turned into typed settings.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::DispatchOptions;
use crate::error::ConfigError;
use crate::ors::{OrsClient, OrsConfig};
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::retry::RetryPolicy;
use crate::traits::RouteDistanceProvider;

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "technician_short".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            min_connections: 1,
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

/// Which routing service answers authoritative distance queries.
#[derive(Debug, Clone)]
pub enum RoutingBackend {
    OpenRouteService(OrsConfig),
    Osrm(OsrmConfig),
}

impl Default for RoutingBackend {
    fn default() -> Self {
        RoutingBackend::OpenRouteService(OrsConfig::default())
    }
}

impl RoutingBackend {
    /// Build the HTTP client for this backend.
    pub fn build_provider(&self) -> Result<Box<dyn RouteDistanceProvider>, reqwest::Error> {
        let provider: Box<dyn RouteDistanceProvider> = match self {
            RoutingBackend::OpenRouteService(config) => Box::new(OrsClient::new(config.clone())?),
            RoutingBackend::Osrm(config) => Box::new(OsrmClient::new(config.clone())?),
        };
        Ok(provider)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    pub database: DatabaseConfig,
    pub routing: RoutingBackend,
    pub retry: RetryPolicy,
    pub options: DispatchOptions,
}

/// Raw environment variables, lowercased by the `config` crate.
#[derive(Debug, Deserialize)]
struct EnvSettings {
    db_host: Option<String>,
    db_port: Option<u16>,
    db_name: Option<String>,
    db_user: Option<String>,
    db_password: Option<String>,
    db_pool_min: Option<u32>,
    db_pool_max: Option<u32>,
    routing_backend: Option<String>,
    openroute_api_key: Option<String>,
    openroute_base_url: Option<String>,
    osrm_base_url: Option<String>,
    osrm_profile: Option<String>,
    routing_timeout_secs: Option<u64>,
    dispatch_shortlist_size: Option<usize>,
    dispatch_deadline_secs: Option<u64>,
}

impl DispatchConfig {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(::config::Environment::default())
    }

    /// Load settings from an explicit variable map instead of the process
    /// environment.
    pub fn from_env_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(::config::Environment::default().source(Some(vars)))
    }

    fn load(source: ::config::Environment) -> Result<Self, ConfigError> {
        let settings: EnvSettings = ::config::Config::builder()
            .add_source(source.ignore_empty(true))
            .build()?
            .try_deserialize()?;
        Self::from_settings(settings)
    }

    fn from_settings(env: EnvSettings) -> Result<Self, ConfigError> {
        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            host: env.db_host.unwrap_or(defaults.host),
            port: env.db_port.unwrap_or(defaults.port),
            name: env.db_name.unwrap_or(defaults.name),
            user: env.db_user.unwrap_or(defaults.user),
            password: env.db_password.ok_or(ConfigError::Missing("DB_PASSWORD"))?,
            min_connections: env.db_pool_min.unwrap_or(defaults.min_connections),
            max_connections: env.db_pool_max.unwrap_or(defaults.max_connections),
            acquire_timeout_secs: defaults.acquire_timeout_secs,
        };
        if database.max_connections == 0 || database.min_connections > database.max_connections {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_MAX",
                message: format!(
                    "pool bounds {}..={} are not usable",
                    database.min_connections, database.max_connections
                ),
            });
        }

        let backend = env
            .routing_backend
            .as_deref()
            .unwrap_or("openrouteservice")
            .to_ascii_lowercase();
        let routing = match backend.as_str() {
            "openrouteservice" | "ors" => {
                let defaults = OrsConfig::default();
                RoutingBackend::OpenRouteService(OrsConfig {
                    base_url: env.openroute_base_url.unwrap_or(defaults.base_url),
                    api_key: env
                        .openroute_api_key
                        .ok_or(ConfigError::Missing("OPENROUTE_API_KEY"))?,
                    timeout_secs: env.routing_timeout_secs.unwrap_or(defaults.timeout_secs),
                })
            }
            "osrm" => {
                let defaults = OsrmConfig::default();
                RoutingBackend::Osrm(OsrmConfig {
                    base_url: env.osrm_base_url.unwrap_or(defaults.base_url),
                    profile: env.osrm_profile.unwrap_or(defaults.profile),
                    timeout_secs: env.routing_timeout_secs.unwrap_or(defaults.timeout_secs),
                })
            }
            other => {
                return Err(ConfigError::Invalid {
                    key: "ROUTING_BACKEND",
                    message: format!("unknown backend {other:?}"),
                });
            }
        };

        let defaults = DispatchOptions::default();
        let options = DispatchOptions {
            shortlist_size: env.dispatch_shortlist_size.unwrap_or(defaults.shortlist_size),
            resolution_deadline: env.dispatch_deadline_secs.map(Duration::from_secs),
        };
        if options.shortlist_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DISPATCH_SHORTLIST_SIZE",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            database,
            routing,
            retry: RetryPolicy::default(),
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_with_required_values() {
        let config = DispatchConfig::from_env_map(vars(&[
            ("DB_PASSWORD", "secret"),
            ("OPENROUTE_API_KEY", "key-123"),
        ]))
        .expect("config");

        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "technician_short");
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.options.shortlist_size, 5);
        assert_eq!(config.options.resolution_deadline, None);
        assert_eq!(config.retry, RetryPolicy::default());

        match config.routing {
            RoutingBackend::OpenRouteService(ors) => {
                assert_eq!(ors.api_key, "key-123");
                assert_eq!(ors.base_url, crate::ors::DEFAULT_ORS_BASE_URL);
                assert_eq!(ors.timeout_secs, 15);
            }
            other => panic!("unexpected backend {other:?}"),
        }
    }

    #[test]
    fn test_overrides() {
        let config = DispatchConfig::from_env_map(vars(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_PASSWORD", "secret"),
            ("DB_POOL_MAX", "4"),
            ("ROUTING_BACKEND", "osrm"),
            ("OSRM_BASE_URL", "http://osrm:5000"),
            ("ROUTING_TIMEOUT_SECS", "3"),
            ("DISPATCH_SHORTLIST_SIZE", "8"),
            ("DISPATCH_DEADLINE_SECS", "20"),
        ]))
        .expect("config");

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.options.shortlist_size, 8);
        assert_eq!(config.options.resolution_deadline, Some(Duration::from_secs(20)));
        match config.routing {
            RoutingBackend::Osrm(osrm) => {
                assert_eq!(osrm.base_url, "http://osrm:5000");
                assert_eq!(osrm.profile, "car");
                assert_eq!(osrm.timeout_secs, 3);
            }
            other => panic!("unexpected backend {other:?}"),
        }
    }

    #[test]
    fn test_missing_password() {
        let err = DispatchConfig::from_env_map(vars(&[("OPENROUTE_API_KEY", "k")]))
            .expect_err("password is required");
        assert!(matches!(err, ConfigError::Missing("DB_PASSWORD")));
    }

    #[test]
    fn test_missing_api_key_only_for_openrouteservice() {
        let err = DispatchConfig::from_env_map(vars(&[("DB_PASSWORD", "p")]))
            .expect_err("api key is required");
        assert!(matches!(err, ConfigError::Missing("OPENROUTE_API_KEY")));

        DispatchConfig::from_env_map(vars(&[("DB_PASSWORD", "p"), ("ROUTING_BACKEND", "osrm")]))
            .expect("osrm needs no key");
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = DispatchConfig::from_env_map(vars(&[
            ("DB_PASSWORD", "p"),
            ("OPENROUTE_API_KEY", "k"),
            ("DISPATCH_SHORTLIST_SIZE", "0"),
        ]))
        .expect_err("zero shortlist");
        assert!(matches!(err, ConfigError::Invalid { key: "DISPATCH_SHORTLIST_SIZE", .. }));

        let err = DispatchConfig::from_env_map(vars(&[
            ("DB_PASSWORD", "p"),
            ("ROUTING_BACKEND", "carrier-pigeon"),
        ]))
        .expect_err("unknown backend");
        assert!(matches!(err, ConfigError::Invalid { key: "ROUTING_BACKEND", .. }));
    }

    #[test]
    fn test_build_provider() {
        let backend = RoutingBackend::Osrm(OsrmConfig::default());
        assert!(backend.build_provider().is_ok());
    }
}
