pub mod repository;

pub use repository::{
    BookingRepository, CustomerDirectory, DepartureRepository, VendorCostRepository,
};
