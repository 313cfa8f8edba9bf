pub mod payments;
pub mod quota;

pub use payments::{PaymentError, PaymentLedger, PaymentPosted};
pub use quota::{QuotaError, QuotaLedger, QuotaSnapshot, Reservation};
