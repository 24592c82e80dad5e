use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BookingId, ClientId, SeatId, ShowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Paid,
    Cancelled,
}

/// A group of seats with a payment obligation. `total_amount_cents` is fixed
/// at creation and never recomputed. The confirmation token is the only
/// identifier exposed to payment redirects; the integer id stays internal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub show_id: ShowId,
    pub client_id: ClientId,
    pub seat_ids: Vec<SeatId>,
    pub status: BookingStatus,
    pub total_amount_cents: i64,
    pub created_at: DateTime<Utc>,
    pub payment_deadline: DateTime<Utc>,
    pub payment_reference: Option<String>,
    pub confirmation_token: Uuid,
}

impl Booking {
    pub fn is_pending(&self) -> bool {
        self.status == BookingStatus::Pending
    }
}
