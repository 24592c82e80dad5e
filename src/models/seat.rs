use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ClientId, SeatId};

/// Seat lifecycle: `Free -> Held -> Free | Booked`. A booked seat carries no
/// holder or expiry; ownership lives on the booking from that point on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum SeatState {
    Free,
    Held {
        holder: ClientId,
        expires_at: DateTime<Utc>,
    },
    Booked {
        booking_id: BookingId,
    },
}

impl SeatState {
    /// A hold that has outlived its expiry is dead weight: any client may
    /// claim the seat, the sweeper may reclaim it.
    pub fn is_live_hold(&self, now: DateTime<Utc>) -> bool {
        matches!(self, SeatState::Held { expires_at, .. } if *expires_at > now)
    }

    pub fn held_by(&self, client_id: ClientId) -> bool {
        matches!(self, SeatState::Held { holder, .. } if *holder == client_id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeatState::Free => "FREE",
            SeatState::Held { .. } => "HELD",
            SeatState::Booked { .. } => "BOOKED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub row: String,
    pub number: u32,
    pub state: SeatState,
}

impl Seat {
    /// Human-readable label, e.g. "C7".
    pub fn label(&self) -> String {
        format!("{}{}", self.row, self.number)
    }
}
