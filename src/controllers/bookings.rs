//! Booking lifecycle endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::BookingError;
use crate::middleware::ClientIdentity;
use crate::models::{Booking, BookingId, BookingStatus, SeatId, ShowId};
use crate::services::booking::CancelActor;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/confirm", patch(confirm_payment))
        .route("/bookings/cancel", patch(cancel_booking))
        .route("/bookings/confirmation/{token}", get(booking_by_token))
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub show_id: ShowId,
    pub seat_ids: Vec<SeatId>,
    pub status: BookingStatus,
    pub total_amount_cents: i64,
    pub payment_deadline: DateTime<Utc>,
    pub payment_reference: Option<String>,
    pub confirmation_token: Uuid,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            booking_id: b.id,
            show_id: b.show_id,
            seat_ids: b.seat_ids,
            status: b.status,
            total_amount_cents: b.total_amount_cents,
            payment_deadline: b.payment_deadline,
            payment_reference: b.payment_reference,
            confirmation_token: b.confirmation_token,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
struct CreateBookingRequest {
    #[validate(range(min = 1))]
    show_id: ShowId,
    #[validate(length(min = 1))]
    seat_ids: Vec<SeatId>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    ClientIdentity(client_id): ClientIdentity,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, BookingError> {
    req.validate()?;
    let booking = state
        .bookings
        .create_booking(req.show_id, &req.seat_ids, client_id)?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

#[derive(Debug, Deserialize, Validate)]
struct ConfirmPaymentRequest {
    #[validate(range(min = 1))]
    booking_id: BookingId,
    #[validate(length(min = 1))]
    payment_reference: String,
}

async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, BookingError> {
    req.validate()?;
    let booking = state
        .bookings
        .confirm_payment(req.booking_id, &req.payment_reference)?;
    Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}

#[derive(Debug, Deserialize, Validate)]
struct CancelBookingRequest {
    #[validate(range(min = 1))]
    booking_id: BookingId,
}

async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    ClientIdentity(client_id): ClientIdentity,
    Json(req): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, BookingError> {
    req.validate()?;
    state
        .bookings
        .cancel_booking(req.booking_id, CancelActor::Client(client_id))?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "success": true, "message": "booking cancelled" })),
    ))
}

async fn booking_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let booking = state.bookings.find_by_token(token)?;
    Ok((StatusCode::OK, Json(BookingResponse::from(booking))))
}
