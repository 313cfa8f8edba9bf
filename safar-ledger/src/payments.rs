use std::collections::HashMap;
use std::sync::Mutex;

use safar_domain::{Payment, PaymentKind};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("Correction amount must be non-zero")]
    ZeroCorrection,

    #[error("Payment of {attempted} would exceed total {total}; already paid {already_paid}")]
    ExceedsTotal {
        attempted: i64,
        total: i64,
        already_paid: i64,
    },

    #[error("Correction of {attempted} would drive paid amount below zero; currently paid {already_paid}")]
    WouldGoNegative { attempted: i64, already_paid: i64 },
}

/// Outcome of a posted ledger entry
#[derive(Debug, Clone, Copy)]
pub struct PaymentPosted {
    /// Running sum of all entries for the booking after this one
    pub paid_amount: i64,
    /// True when this entry moved the paid amount from 0 to positive,
    /// which is what confirms a pending booking
    pub first_payment: bool,
}

/// Append-only record of payments per booking.
///
/// Entries are never edited in place; mistakes are corrected with
/// sign-adjusted `Correction` entries. Appends for the same booking
/// serialize through the ledger lock so the recomputed sum can never go
/// stale against the entries it summarizes.
pub struct PaymentLedger {
    entries: Mutex<HashMap<Uuid, Vec<Payment>>>,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Append a payment and recompute the booking's paid amount.
    /// Rejected if it would overshoot `total_price`; the total is immutable
    /// and payments cannot exceed it.
    pub fn record_payment(
        &self,
        booking_id: Uuid,
        amount: i64,
        total_price: i64,
    ) -> Result<PaymentPosted, PaymentError> {
        if amount <= 0 {
            return Err(PaymentError::NonPositiveAmount(amount));
        }

        let mut entries = self.entries.lock().expect("payment ledger poisoned");
        let ledger = entries.entry(booking_id).or_default();
        let already_paid: i64 = ledger.iter().map(|entry| entry.amount).sum();

        if already_paid + amount > total_price {
            return Err(PaymentError::ExceedsTotal {
                attempted: amount,
                total: total_price,
                already_paid,
            });
        }

        ledger.push(Payment::new(booking_id, amount, PaymentKind::Payment));
        let paid_amount = already_paid + amount;
        debug!(%booking_id, amount, paid_amount, "payment recorded");

        Ok(PaymentPosted {
            paid_amount,
            first_payment: already_paid == 0,
        })
    }

    /// Append a sign-adjusted correction entry. The running sum must stay
    /// inside `[0, total_price]`.
    pub fn record_correction(
        &self,
        booking_id: Uuid,
        amount: i64,
        total_price: i64,
    ) -> Result<PaymentPosted, PaymentError> {
        if amount == 0 {
            return Err(PaymentError::ZeroCorrection);
        }

        let mut entries = self.entries.lock().expect("payment ledger poisoned");
        let ledger = entries.entry(booking_id).or_default();
        let already_paid: i64 = ledger.iter().map(|entry| entry.amount).sum();

        let adjusted = already_paid + amount;
        if adjusted < 0 {
            return Err(PaymentError::WouldGoNegative {
                attempted: amount,
                already_paid,
            });
        }
        if adjusted > total_price {
            return Err(PaymentError::ExceedsTotal {
                attempted: amount,
                total: total_price,
                already_paid,
            });
        }

        ledger.push(Payment::new(booking_id, amount, PaymentKind::Correction));
        debug!(%booking_id, amount, paid_amount = adjusted, "correction recorded");

        Ok(PaymentPosted {
            paid_amount: adjusted,
            first_payment: already_paid == 0 && adjusted > 0,
        })
    }

    /// Current sum of all entries for a booking (0 if none)
    pub fn paid_amount(&self, booking_id: Uuid) -> i64 {
        self.entries
            .lock()
            .expect("payment ledger poisoned")
            .get(&booking_id)
            .map(|ledger| ledger.iter().map(|entry| entry.amount).sum())
            .unwrap_or(0)
    }

    /// Audit trail for a booking, oldest entry first
    pub fn entries(&self, booking_id: Uuid) -> Vec<Payment> {
        self.entries
            .lock()
            .expect("payment ledger poisoned")
            .get(&booking_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for PaymentLedger {
    fn default() -> Self {
        Self::new()
    }
}
