//! Reservation engine: temporary, client-scoped seat holds.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::BookingError;
use crate::models::{ClientId, Seat, SeatId, SeatState, ShowId};
use crate::services::unique_seat_ids;
use crate::store::InventoryStore;

#[derive(Clone)]
pub struct ReservationEngine {
    store: Arc<InventoryStore>,
    default_ttl: Duration,
}

impl ReservationEngine {
    pub fn new(store: Arc<InventoryStore>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// Places a hold on every requested seat, all-or-nothing. A seat that is
    /// booked, live-held by a different client, or backing a pending booking
    /// makes the whole call fail with `Conflict` and leaves no seat mutated.
    /// Re-holding seats the client already holds just extends the expiry.
    pub fn hold(
        &self,
        show_id: ShowId,
        seat_ids: &[SeatId],
        client_id: ClientId,
        ttl: Option<Duration>,
    ) -> Result<Vec<(SeatId, DateTime<Utc>)>, BookingError> {
        let seat_ids = unique_seat_ids(seat_ids)?;
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl <= Duration::zero() {
            return Err(BookingError::InvalidRequest(
                "ttl must be positive".to_string(),
            ));
        }

        self.store.with_show(show_id, |_, state, now| {
            // Validate the full set before mutating anything.
            let mut conflicts = Vec::new();
            for &seat_id in &seat_ids {
                let seat = state.seats.get(&seat_id).ok_or_else(|| {
                    BookingError::InvalidRequest(format!(
                        "seat {seat_id} does not belong to show {show_id}"
                    ))
                })?;
                // A seat backing a pending booking stays promised to that
                // booking even past its hold expiry, and its expiry must not
                // be shrunk below the payment deadline by a re-hold.
                if state.pending_booking_for(seat_id).is_some() {
                    conflicts.push(seat_id);
                    continue;
                }
                match &seat.state {
                    SeatState::Booked { .. } => conflicts.push(seat_id),
                    held @ SeatState::Held { .. }
                        if !held.held_by(client_id) && held.is_live_hold(now) =>
                    {
                        conflicts.push(seat_id)
                    }
                    _ => {}
                }
            }
            if !conflicts.is_empty() {
                return Err(BookingError::Conflict(conflicts));
            }

            let expires_at = now + ttl;
            for &seat_id in &seat_ids {
                if let Some(seat) = state.seats.get_mut(&seat_id) {
                    seat.state = SeatState::Held {
                        holder: client_id,
                        expires_at,
                    };
                }
            }
            debug!(show_id, client_id, seats = seat_ids.len(), %expires_at, "seats held");
            Ok(seat_ids.iter().map(|&id| (id, expires_at)).collect())
        })
    }

    /// Releases the caller's own holds on the given seats. Seats not held by
    /// the caller are silently left alone, as are seats already promoted
    /// into a pending booking (those are resolved through the booking).
    pub fn release(
        &self,
        show_id: ShowId,
        seat_ids: &[SeatId],
        client_id: ClientId,
    ) -> Result<(), BookingError> {
        let seat_ids = unique_seat_ids(seat_ids)?;
        self.store.with_show(show_id, |_, state, _| {
            let mut released = 0usize;
            for &seat_id in &seat_ids {
                if state.pending_booking_for(seat_id).is_some() {
                    continue;
                }
                if let Some(seat) = state.seats.get_mut(&seat_id) {
                    if seat.state.held_by(client_id) {
                        seat.state = SeatState::Free;
                        released += 1;
                    }
                }
            }
            debug!(show_id, client_id, released, "seats released");
            Ok(())
        })
    }

    /// Snapshot of the show's seat map. Reads never have mutating side
    /// effects; expired holds are reclaimed by the sweeper, not here.
    pub fn list_seats(&self, show_id: ShowId) -> Result<Vec<Seat>, BookingError> {
        self.store.snapshot_seats(show_id)
    }
}
