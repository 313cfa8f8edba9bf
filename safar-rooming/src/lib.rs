pub mod allocation;
pub mod pricing;

pub use allocation::{plan_rooms, RoomLine, RoomingPlan};
pub use pricing::price_total;

use safar_domain::RoomType;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoomingError {
    #[error("Invalid allocation: {0}")]
    InvalidAllocation(String),

    #[error("No price entry for room type {0}")]
    PriceMismatch(RoomType),
}
