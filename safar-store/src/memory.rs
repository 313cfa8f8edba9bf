use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use safar_core::{BookingRepository, CustomerDirectory, DepartureRepository, VendorCostRepository};
use safar_domain::{Booking, BookingStatus, Customer, Departure, VendorCost};
use uuid::Uuid;

/// In-memory booking store. This is the seam where a SQL-backed
/// implementation would plug in; the engine only sees the trait.
pub struct InMemoryBookingRepository {
    rows: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut rows = self.rows.write().expect("booking store poisoned");
        if rows.contains_key(&booking.id) {
            return Err(format!("booking {} already exists", booking.id).into());
        }
        rows.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = self.rows.read().expect("booking store poisoned");
        Ok(rows.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut rows = self.rows.write().expect("booking store poisoned");
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| format!("booking {} not found", id))?;
        row.update_status(status);
        Ok(())
    }

    async fn apply_payment(
        &self,
        id: Uuid,
        paid_amount: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut rows = self.rows.write().expect("booking store poisoned");
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| format!("booking {} not found", id))?;
        row.apply_payment(paid_amount);
        Ok(())
    }

    async fn list_for_departure(
        &self,
        departure_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = self.rows.read().expect("booking store poisoned");
        Ok(rows
            .values()
            .filter(|booking| booking.departure_id == departure_id)
            .cloned()
            .collect())
    }
}

/// In-memory mirror of the externally managed departure schedule
pub struct InMemoryDepartureRepository {
    rows: RwLock<HashMap<Uuid, Departure>>,
}

impl InMemoryDepartureRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDepartureRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DepartureRepository for InMemoryDepartureRepository {
    async fn insert(
        &self,
        departure: &Departure,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut rows = self.rows.write().expect("departure store poisoned");
        rows.insert(departure.id, departure.clone());
        Ok(())
    }

    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Departure>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = self.rows.read().expect("departure store poisoned");
        Ok(rows.get(&id).cloned())
    }
}

/// In-memory vendor cost entries, appended by the external cost-entry
/// workflow and read by the financial aggregator
pub struct InMemoryVendorCostRepository {
    rows: RwLock<HashMap<Uuid, Vec<VendorCost>>>,
}

impl InMemoryVendorCostRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryVendorCostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VendorCostRepository for InMemoryVendorCostRepository {
    async fn add(&self, cost: &VendorCost) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut rows = self.rows.write().expect("vendor cost store poisoned");
        rows.entry(cost.departure_id).or_default().push(cost.clone());
        Ok(())
    }

    async fn list_for_departure(
        &self,
        departure_id: Uuid,
    ) -> Result<Vec<VendorCost>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = self.rows.read().expect("vendor cost store poisoned");
        Ok(rows.get(&departure_id).cloned().unwrap_or_default())
    }
}

/// In-memory stand-in for the external customer directory
pub struct InMemoryCustomerDirectory {
    rows: RwLock<HashMap<Uuid, Customer>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Mirror a directory entry locally (the directory itself is owned by
    /// the identity service; entries are never mutated here)
    pub fn upsert(&self, customer: Customer) {
        let mut rows = self.rows.write().expect("customer directory poisoned");
        rows.insert(customer.id, customer);
    }
}

impl Default for InMemoryCustomerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Customer>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = self.rows.read().expect("customer directory poisoned");
        Ok(rows.get(&id).cloned())
    }
}
