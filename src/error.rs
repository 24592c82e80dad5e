use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::SeatId;

/// Failure taxonomy for seat and booking mutations. Every variant is reported
/// synchronously to the caller; nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Another client holds or has booked at least one of the requested seats.
    #[error("seats already held or booked by another client: {0:?}")]
    Conflict(Vec<SeatId>),

    /// Booking-time validation failure; same root cause as `Conflict` but
    /// surfaced at the booking boundary.
    #[error("seats unavailable for booking: {0:?}")]
    SeatUnavailable(Vec<SeatId>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("booking is already finalized")]
    AlreadyFinalized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("payment gateway error: {0}")]
    Gateway(String),
}

impl BookingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::Conflict(_) | BookingError::SeatUnavailable(_) => StatusCode::CONFLICT,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::AlreadyFinalized => StatusCode::CONFLICT,
            BookingError::InvalidRequest(_) | BookingError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            BookingError::Gateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            BookingError::Conflict(_) => "conflict",
            BookingError::SeatUnavailable(_) => "seat_unavailable",
            BookingError::NotFound(_) => "not_found",
            BookingError::AlreadyFinalized => "already_finalized",
            BookingError::InvalidRequest(_) => "invalid_request",
            BookingError::Validation(_) => "validation_error",
            BookingError::Gateway(_) => "gateway_error",
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.code(),
            "message": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}
