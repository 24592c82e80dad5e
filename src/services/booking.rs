//! Booking orchestrator: groups held seats into a booking and drives it
//! through pending -> paid or pending -> cancelled.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;
use uuid::Uuid;

use crate::error::BookingError;
use crate::models::{
    Booking, BookingId, BookingStatus, ClientId, SeatId, SeatState, ShowId,
};
use crate::services::notification::Notifier;
use crate::services::unique_seat_ids;
use crate::store::InventoryStore;

/// Who is asking for a cancellation. Clients may only cancel their own
/// pending bookings; the admin override extends to paid ones (refund path);
/// the system actor is the sweeper, which only ever cancels pending bookings.
#[derive(Debug, Clone, Copy)]
pub enum CancelActor {
    Client(ClientId),
    Admin,
    System,
}

#[derive(Clone)]
pub struct BookingOrchestrator {
    store: Arc<InventoryStore>,
    notifier: Arc<dyn Notifier>,
    payment_timeout: Duration,
}

impl BookingOrchestrator {
    pub fn new(
        store: Arc<InventoryStore>,
        notifier: Arc<dyn Notifier>,
        payment_timeout: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            payment_timeout,
        }
    }

    /// Promotes a set of seats into a pending booking. Each seat must be free
    /// or held by the caller (a caller's own expired hold is reclaimable) and
    /// must not back another pending booking; anything else fails the whole
    /// call with `SeatUnavailable` and mutates nothing. Holds are extended to
    /// the payment deadline so they cannot expire mid-checkout.
    pub fn create_booking(
        &self,
        show_id: ShowId,
        seat_ids: &[SeatId],
        client_id: ClientId,
    ) -> Result<Booking, BookingError> {
        let seat_ids = unique_seat_ids(seat_ids)?;
        let booking_id = self.store.allocate_booking_id();
        let token = Uuid::new_v4();
        let timeout = self.payment_timeout;

        let booking = self.store.with_show(show_id, |show, state, now| {
            let mut unavailable = Vec::new();
            for &seat_id in &seat_ids {
                let seat = state.seats.get(&seat_id).ok_or_else(|| {
                    BookingError::InvalidRequest(format!(
                        "seat {seat_id} does not belong to show {show_id}"
                    ))
                })?;
                // Seats promised to an earlier pending booking are off limits
                // until that booking resolves.
                let claimable = state.pending_booking_for(seat_id).is_none()
                    && match &seat.state {
                        SeatState::Free => true,
                        held @ SeatState::Held { .. } => held.held_by(client_id),
                        SeatState::Booked { .. } => false,
                    };
                if !claimable {
                    unavailable.push(seat_id);
                }
            }
            if !unavailable.is_empty() {
                return Err(BookingError::SeatUnavailable(unavailable));
            }

            let payment_deadline = now + timeout;
            for &seat_id in &seat_ids {
                if let Some(seat) = state.seats.get_mut(&seat_id) {
                    seat.state = SeatState::Held {
                        holder: client_id,
                        expires_at: payment_deadline,
                    };
                }
            }

            let booking = Booking {
                id: booking_id,
                show_id,
                client_id,
                seat_ids: seat_ids.clone(),
                status: BookingStatus::Pending,
                total_amount_cents: show.price_cents * seat_ids.len() as i64,
                created_at: now,
                payment_deadline,
                payment_reference: None,
                confirmation_token: token,
            };
            state.bookings.insert(booking_id, booking.clone());
            Ok(booking)
        })?;

        self.store.index_booking(booking_id, show_id, token);
        info!(
            booking_id,
            show_id,
            client_id,
            seats = booking.seat_ids.len(),
            total_cents = booking.total_amount_cents,
            "booking created"
        );
        Ok(booking)
    }

    /// Marks a pending booking paid and its seats permanently booked, then
    /// fires the confirmation notification outside the seat lock. Every seat
    /// must still be held by the booking's client; a seat lost in the
    /// meantime fails the confirmation with `Conflict` and flips nothing.
    pub fn confirm_payment(
        &self,
        booking_id: BookingId,
        payment_reference: &str,
    ) -> Result<Booking, BookingError> {
        let show_id = self
            .store
            .show_for_booking(booking_id)
            .ok_or(BookingError::NotFound("booking"))?;

        let (booking, show, seats) = self.store.with_show(show_id, |show, state, _| {
            let (client_id, seat_ids) = {
                let booking = state
                    .bookings
                    .get(&booking_id)
                    .ok_or(BookingError::NotFound("booking"))?;
                if !booking.is_pending() {
                    return Err(BookingError::AlreadyFinalized);
                }
                (booking.client_id, booking.seat_ids.clone())
            };

            let lost: Vec<SeatId> = seat_ids
                .iter()
                .copied()
                .filter(|id| {
                    !matches!(state.seats.get(id), Some(s) if s.state.held_by(client_id))
                })
                .collect();
            if !lost.is_empty() {
                return Err(BookingError::Conflict(lost));
            }

            let booking = state
                .bookings
                .get_mut(&booking_id)
                .ok_or(BookingError::NotFound("booking"))?;
            booking.status = BookingStatus::Paid;
            booking.payment_reference = Some(payment_reference.to_string());
            let snapshot = booking.clone();

            for seat_id in &snapshot.seat_ids {
                if let Some(seat) = state.seats.get_mut(seat_id) {
                    seat.state = SeatState::Booked { booking_id };
                }
            }
            let seats = snapshot
                .seat_ids
                .iter()
                .filter_map(|id| state.seats.get(id).cloned())
                .collect::<Vec<_>>();
            Ok((snapshot, show.clone(), seats))
        })?;

        self.notifier.booking_confirmed(&booking, &show, &seats);
        info!(booking_id, payment_reference, "booking paid");
        Ok(booking)
    }

    /// Cancels a booking and releases its seats. Cancellation always wins:
    /// every referenced seat goes back to free regardless of lingering hold
    /// state.
    pub fn cancel_booking(
        &self,
        booking_id: BookingId,
        actor: CancelActor,
    ) -> Result<(), BookingError> {
        let show_id = self
            .store
            .show_for_booking(booking_id)
            .ok_or(BookingError::NotFound("booking"))?;

        self.store.with_show(show_id, |_, state, _| {
            let booking = state
                .bookings
                .get_mut(&booking_id)
                .ok_or(BookingError::NotFound("booking"))?;
            // Clients cannot see (let alone cancel) other clients' bookings.
            if let CancelActor::Client(client_id) = actor {
                if booking.client_id != client_id {
                    return Err(BookingError::NotFound("booking"));
                }
            }
            match (booking.status, actor) {
                (BookingStatus::Pending, _) => {}
                (BookingStatus::Paid, CancelActor::Admin) => {}
                _ => return Err(BookingError::AlreadyFinalized),
            }
            booking.status = BookingStatus::Cancelled;
            let seat_ids = booking.seat_ids.clone();
            for seat_id in seat_ids {
                if let Some(seat) = state.seats.get_mut(&seat_id) {
                    seat.state = SeatState::Free;
                }
            }
            Ok(())
        })?;

        info!(booking_id, ?actor, "booking cancelled");
        Ok(())
    }

    pub fn get_booking(&self, booking_id: BookingId) -> Result<Booking, BookingError> {
        let show_id = self
            .store
            .show_for_booking(booking_id)
            .ok_or(BookingError::NotFound("booking"))?;
        self.store.with_show(show_id, |_, state, _| {
            state
                .bookings
                .get(&booking_id)
                .cloned()
                .ok_or(BookingError::NotFound("booking"))
        })
    }

    /// Idempotent public lookup by confirmation token, for clients returning
    /// from the payment redirect.
    pub fn find_by_token(&self, token: Uuid) -> Result<Booking, BookingError> {
        let booking_id = self
            .store
            .booking_for_token(token)
            .ok_or(BookingError::NotFound("booking"))?;
        self.get_booking(booking_id)
    }
}
