//! In-process [`DispatchStore`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::model::{
    Assignment, AssignmentId, Coordinate, Customer, CustomerId, NewAssignment, Technician,
    TechnicianId,
};
use crate::traits::DispatchStore;

#[derive(Debug, Default)]
struct Tables {
    customers: BTreeMap<CustomerId, Coordinate>,
    technicians: BTreeMap<TechnicianId, Technician>,
    assignments: Vec<Assignment>,
    last_assigned_at: Option<DateTime<Utc>>,
}

/// Keeps every table in memory behind a single lock.
///
/// Assignment identifiers count up from 1 and timestamps never go
/// backwards, matching what a serial column and `now()` give in a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customer(mut self, id: i32, lat: f64, lng: f64) -> Self {
        self.tables
            .get_mut()
            .customers
            .insert(CustomerId(id), Coordinate::new(lat, lng));
        self
    }

    pub fn with_technician(mut self, id: i32, lat: f64, lng: f64, active: bool) -> Self {
        self.tables.get_mut().technicians.insert(
            TechnicianId(id),
            Technician {
                id: TechnicianId(id),
                location: Coordinate::new(lat, lng),
                active,
            },
        );
        self
    }

    pub async fn upsert_customer(&self, customer: Customer) {
        self.tables
            .write()
            .await
            .customers
            .insert(customer.id, customer.location);
    }

    pub async fn upsert_technician(&self, technician: Technician) {
        self.tables
            .write()
            .await
            .technicians
            .insert(technician.id, technician);
    }

    pub async fn set_active(&self, id: TechnicianId, active: bool) -> bool {
        match self.tables.write().await.technicians.get_mut(&id) {
            Some(technician) => {
                technician.active = active;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl DispatchStore for MemoryStore {
    async fn customer(&self, id: CustomerId) -> Result<Customer, StoreError> {
        let tables = self.tables.read().await;
        tables
            .customers
            .get(&id)
            .map(|location| Customer {
                id,
                location: *location,
            })
            .ok_or(StoreError::CustomerNotFound(id))
    }

    async fn active_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .technicians
            .values()
            .filter(|technician| technician.active)
            .cloned()
            .collect())
    }

    async fn record_assignment(&self, assignment: NewAssignment) -> Result<Assignment, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.customers.contains_key(&assignment.customer_id) {
            return Err(StoreError::Constraint(format!(
                "customer {} does not exist",
                assignment.customer_id
            )));
        }
        if !tables.technicians.contains_key(&assignment.technician_id) {
            return Err(StoreError::Constraint(format!(
                "technician {} does not exist",
                assignment.technician_id
            )));
        }

        let now = Utc::now();
        let assigned_at = match tables.last_assigned_at {
            Some(last) if last > now => last,
            _ => now,
        };
        tables.last_assigned_at = Some(assigned_at);

        let next_id = i32::try_from(tables.assignments.len() + 1)
            .map_err(|_| StoreError::Unavailable("assignment id space exhausted".into()))?;
        let record = Assignment {
            id: AssignmentId(next_id),
            customer_id: assignment.customer_id,
            technician_id: assignment.technician_id,
            distance_km: assignment.distance_km,
            assigned_at,
        };
        tables.assignments.push(record.clone());
        Ok(record)
    }

    async fn assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.assignments.iter().rev().cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
