pub mod booking;
pub mod departure;
pub mod payment;
pub mod room;

pub use booking::{Booking, BookingStatus};
pub use departure::{Departure, DepartureStatus};
pub use payment::{Customer, Payment, PaymentKind, VendorCost, VendorCostStatus};
pub use room::{PaxCounts, PriceTable, RoomType};
