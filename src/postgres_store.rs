//! PostgreSQL-backed [`DispatchStore`].
//!
//! Expects the `customers`, `technicians` and `assignments` tables to exist
//! already; creating them is left to whoever provisions the database.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::model::{
    Assignment, AssignmentId, Coordinate, Customer, CustomerId, NewAssignment, Technician,
    TechnicianId,
};
use crate::traits::DispatchStore;

/// Every query checks a connection out of the pool for one statement only.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        debug!(
            host = %config.host,
            database = %config.name,
            max_connections = config.max_connections,
            "database pool ready"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_assignment(row: &PgRow) -> Result<Assignment, StoreError> {
        Ok(Assignment {
            id: AssignmentId(row.try_get("id")?),
            customer_id: CustomerId(row.try_get("cust_id")?),
            technician_id: TechnicianId(row.try_get("tech_id")?),
            distance_km: row.try_get("distance_km")?,
            assigned_at: row.try_get::<DateTime<Utc>, _>("assigned_at")?,
        })
    }
}

#[async_trait]
impl DispatchStore for PostgresStore {
    async fn customer(&self, id: CustomerId) -> Result<Customer, StoreError> {
        let row = sqlx::query(
            "SELECT customerid, latitude, longitude FROM public.customers WHERE customerid = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::CustomerNotFound(id))?;

        Ok(Customer {
            id,
            location: Coordinate::new(row.try_get("latitude")?, row.try_get("longitude")?),
        })
    }

    async fn active_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        let rows = sqlx::query(
            "SELECT technicianid, latitude, longitude FROM public.technicians WHERE is_active = TRUE",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<Technician, StoreError> {
                Ok(Technician {
                    id: TechnicianId(row.try_get("technicianid")?),
                    location: Coordinate::new(row.try_get("latitude")?, row.try_get("longitude")?),
                    active: true,
                })
            })
            .collect()
    }

    async fn record_assignment(&self, assignment: NewAssignment) -> Result<Assignment, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO public.assignments (cust_id, tech_id, distance_km)
            VALUES ($1, $2, $3)
            RETURNING id, cust_id, tech_id, distance_km, assigned_at
            "#,
        )
        .bind(assignment.customer_id.0)
        .bind(assignment.technician_id.0)
        .bind(assignment.distance_km)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StoreError::Constraint(db.message().to_string())
            }
            other => StoreError::Database(other),
        })?;

        Self::row_to_assignment(&row)
    }

    async fn assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, cust_id, tech_id, distance_km, assigned_at
            FROM public.assignments
            ORDER BY assigned_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_assignment).collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
