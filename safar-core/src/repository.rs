use async_trait::async_trait;
use safar_domain::{Booking, BookingStatus, Customer, Departure, VendorCost};
use uuid::Uuid;

/// Repository trait for booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn apply_payment(
        &self,
        id: Uuid,
        paid_amount: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_for_departure(
        &self,
        departure_id: Uuid,
    ) -> Result<Vec<Booking>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for departure schedule records
#[async_trait]
pub trait DepartureRepository: Send + Sync {
    async fn insert(
        &self,
        departure: &Departure,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Departure>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for vendor cost entries (written by the external
/// cost-entry workflow, read here for P&L)
#[async_trait]
pub trait VendorCostRepository: Send + Sync {
    async fn add(
        &self,
        cost: &VendorCost,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_for_departure(
        &self,
        departure_id: Uuid,
    ) -> Result<Vec<VendorCost>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Read-only view of the external customer directory
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Customer>, Box<dyn std::error::Error + Send + Sync>>;
}
