//! Payment initiation and the gateway result webhook.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use validator::Validate;

use crate::error::BookingError;
use crate::middleware::ClientIdentity;
use crate::models::BookingId;
use crate::services::payment::PaymentOutcome;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings/initiatePayment", patch(initiate_payment))
        .route("/payments/webhook", post(payment_webhook))
}

#[derive(Debug, Deserialize, Validate)]
struct InitiatePaymentRequest {
    #[validate(range(min = 1))]
    booking_id: BookingId,
}

async fn initiate_payment(
    State(state): State<Arc<AppState>>,
    ClientIdentity(client_id): ClientIdentity,
    Json(req): Json<InitiatePaymentRequest>,
) -> Result<impl IntoResponse, BookingError> {
    req.validate()?;
    let booking = state.bookings.get_booking(req.booking_id)?;
    if booking.client_id != client_id {
        return Err(BookingError::NotFound("booking"));
    }
    if !booking.is_pending() {
        return Err(BookingError::AlreadyFinalized);
    }

    let description = state
        .catalog
        .show(booking.show_id)
        .and_then(|show| state.catalog.movie(show.movie_id))
        .map(|movie| format!("{} - {} ticket(s)", movie.title, booking.seat_ids.len()))
        .unwrap_or_else(|| format!("booking {}", booking.id));

    // Gateway I/O happens here, never under a seat lock.
    let session = state.payments.initiate(&booking, description).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "session_id": session.session_id,
            "payment_url": session.payment_url,
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(rename = "paymentId")]
    payment_id: String,
    status: PaymentOutcome,
}

/// Invoked by the gateway exactly once per session. A replayed or unknown
/// session id finds nothing and gets a 404.
async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WebhookPayload>,
) -> Result<impl IntoResponse, BookingError> {
    let booking_id = state
        .payments
        .take_session(&payload.payment_id)
        .ok_or(BookingError::NotFound("payment session"))?;

    match payload.status {
        PaymentOutcome::Success => {
            state
                .bookings
                .confirm_payment(booking_id, &payload.payment_id)?;
            Ok((StatusCode::OK, Json(json!({ "success": true }))))
        }
        PaymentOutcome::Failure => {
            // Booking stays pending until retried or swept on timeout.
            warn!(booking_id, payment_id = %payload.payment_id, "payment failed");
            Ok((StatusCode::OK, Json(json!({ "success": true }))))
        }
    }
}
