//! Seat map queries and hold/release operations.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::BookingError;
use crate::middleware::ClientIdentity;
use crate::models::{SeatId, ShowId};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats", get(get_seats))
        .route("/seats/hold", patch(hold_seats))
        .route("/seats/release", patch(release_seats))
}

/* ---------- seat map ---------- */

#[derive(Debug, Deserialize)]
struct SeatsQuery {
    show_id: ShowId,
    row: Option<String>,
    status: Option<String>, // FREE, HELD, BOOKED
    page: Option<u32>,
    #[serde(rename = "pageSize")]
    page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SeatResponse {
    id: SeatId,
    row: String,
    number: u32,
    status: &'static str,
}

async fn get_seats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeatsQuery>,
) -> Result<impl IntoResponse, BookingError> {
    if let Some(ref status) = params.status {
        if !matches!(status.as_str(), "FREE" | "HELD" | "BOOKED") {
            return Err(BookingError::InvalidRequest(
                "status must be FREE | HELD | BOOKED".to_string(),
            ));
        }
    }

    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(100).clamp(1, 100) as usize;
    let offset = (page as usize - 1) * page_size;

    let seats = state.reservations.list_seats(params.show_id)?;
    let payload: Vec<SeatResponse> = seats
        .iter()
        .filter(|s| params.row.as_deref().map_or(true, |r| s.row == r))
        .filter(|s| {
            params
                .status
                .as_deref()
                .map_or(true, |st| s.state.label() == st)
        })
        .skip(offset)
        .take(page_size)
        .map(|s| SeatResponse {
            id: s.id,
            row: s.row.clone(),
            number: s.number,
            status: s.state.label(),
        })
        .collect();

    Ok((StatusCode::OK, Json(payload)))
}

/* ---------- holds ---------- */

#[derive(Debug, Deserialize, Validate)]
struct HoldSeatsRequest {
    #[validate(range(min = 1))]
    show_id: ShowId,
    #[validate(length(min = 1))]
    seat_ids: Vec<SeatId>,
    #[validate(range(min = 1, max = 3600))]
    ttl_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
struct HeldSeat {
    seat_id: SeatId,
    expires_at: DateTime<Utc>,
}

async fn hold_seats(
    State(state): State<Arc<AppState>>,
    ClientIdentity(client_id): ClientIdentity,
    Json(req): Json<HoldSeatsRequest>,
) -> Result<impl IntoResponse, BookingError> {
    req.validate()?;
    let ttl = req.ttl_seconds.map(Duration::seconds);
    let held = state
        .reservations
        .hold(req.show_id, &req.seat_ids, client_id, ttl)?;
    let seats: Vec<HeldSeat> = held
        .into_iter()
        .map(|(seat_id, expires_at)| HeldSeat {
            seat_id,
            expires_at,
        })
        .collect();
    Ok((StatusCode::OK, Json(json!({ "success": true, "seats": seats }))))
}

#[derive(Debug, Deserialize, Validate)]
struct ReleaseSeatsRequest {
    #[validate(range(min = 1))]
    show_id: ShowId,
    #[validate(length(min = 1))]
    seat_ids: Vec<SeatId>,
}

async fn release_seats(
    State(state): State<Arc<AppState>>,
    ClientIdentity(client_id): ClientIdentity,
    Json(req): Json<ReleaseSeatsRequest>,
) -> Result<impl IntoResponse, BookingError> {
    req.validate()?;
    state
        .reservations
        .release(req.show_id, &req.seat_ids, client_id)?;
    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "message": "seats released" })),
    ))
}
