use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use safar_booking::BookingError;
use safar_ledger::{PaymentError, QuotaError};
use safar_rooming::RoomingError;
use serde_json::json;

/// API-level error with a stable machine-readable code, so monitoring can
/// tell "sold out" apart from "data corruption".
#[derive(Debug)]
pub enum AppError {
    Validation { code: &'static str, message: String },
    NotFound(String),
    Conflict { code: &'static str, message: String },
    Unavailable(String),
    Internal { code: &'static str, message: String },
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Validation { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
            AppError::Conflict { code, message } => (StatusCode::CONFLICT, code, message),
            AppError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CONCURRENT_MODIFICATION",
                message,
            ),
            AppError::Internal { code, message } => {
                tracing::error!("Internal Server Error ({}): {}", code, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::Rooming(RoomingError::InvalidAllocation(_)) => AppError::Validation {
                code: "INVALID_ALLOCATION",
                message,
            },
            BookingError::Rooming(RoomingError::PriceMismatch(_)) => AppError::Validation {
                code: "PRICE_MISMATCH",
                message,
            },
            BookingError::Payment(PaymentError::ExceedsTotal { .. }) => AppError::Validation {
                code: "PAYMENT_EXCEEDS_TOTAL",
                message,
            },
            BookingError::Payment(_) => AppError::Validation {
                code: "INVALID_PAYMENT",
                message,
            },
            BookingError::Quota(QuotaError::InsufficientCapacity { .. }) => AppError::Conflict {
                code: "INSUFFICIENT_CAPACITY",
                message,
            },
            BookingError::Quota(QuotaError::ConcurrentModification { .. }) => {
                AppError::Unavailable(message)
            }
            BookingError::Quota(QuotaError::InvariantViolation { .. }) => AppError::Internal {
                code: "INVARIANT_VIOLATION",
                message,
            },
            BookingError::Quota(QuotaError::UnknownDeparture(_)) => AppError::NotFound(message),
            BookingError::Quota(_) => AppError::Conflict {
                code: "RESERVATION_CONFLICT",
                message,
            },
            BookingError::NotFound(_)
            | BookingError::UnknownDeparture(_)
            | BookingError::UnknownCustomer(_) => AppError::NotFound(message),
            BookingError::DepartureClosed(_) => AppError::Conflict {
                code: "DEPARTURE_CLOSED",
                message,
            },
            BookingError::BookingCancelled(_) | BookingError::InvalidTransition { .. } => {
                AppError::Conflict {
                    code: "INVALID_TRANSITION",
                    message,
                }
            }
            BookingError::Store(_) => AppError::Internal {
                code: "STORE_ERROR",
                message,
            },
        }
    }
}

impl From<QuotaError> for AppError {
    fn from(err: QuotaError) -> Self {
        AppError::from(BookingError::Quota(err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}

impl AppError {
    /// Wrap a repository fault
    pub fn store(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        AppError::Internal {
            code: "STORE_ERROR",
            message: err.to_string(),
        }
    }
}
