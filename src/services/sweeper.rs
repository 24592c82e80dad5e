//! Background reclaimer of expired holds and stale pending bookings.
//!
//! Runs on a fixed interval and goes through the same per-show locked
//! mutation path as client-driven operations, so a seat re-held or booked
//! between scan and reclaim is simply skipped.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::BookingError;
use crate::models::{BookingId, SeatId, SeatState, ShowId};
use crate::services::booking::{BookingOrchestrator, CancelActor};
use crate::services::payment::PaymentService;
use crate::store::InventoryStore;

#[derive(Debug, Default, Clone, Copy)]
pub struct SweepStats {
    pub bookings_cancelled: usize,
    pub holds_reclaimed: usize,
}

impl SweepStats {
    pub fn total(&self) -> usize {
        self.bookings_cancelled + self.holds_reclaimed
    }
}

pub struct ExpirySweeper {
    store: Arc<InventoryStore>,
    bookings: BookingOrchestrator,
    payments: Option<Arc<PaymentService>>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(
        store: Arc<InventoryStore>,
        bookings: BookingOrchestrator,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            bookings,
            payments: None,
            interval,
        }
    }

    /// Also prune abandoned gateway sessions on each pass.
    pub fn with_payments(mut self, payments: Arc<PaymentService>) -> Self {
        self.payments = Some(payments);
        self
    }

    /// One full reclaim pass over every show.
    pub fn sweep_once(&self) -> SweepStats {
        let mut stats = SweepStats::default();
        for show_id in self.store.show_ids() {
            self.cancel_stale_bookings(show_id, &mut stats);
            self.reclaim_expired_holds(show_id, &mut stats);
        }
        if let Some(payments) = &self.payments {
            payments.prune_settled(|booking_id| {
                !matches!(self.bookings.get_booking(booking_id), Ok(b) if b.is_pending())
            });
        }
        stats
    }

    /// Rule 1: pending bookings past their payment deadline are cancelled
    /// through the ordinary cancellation path, which re-checks state under
    /// the show lock. A booking paid between scan and cancel is skipped.
    fn cancel_stale_bookings(&self, show_id: ShowId, stats: &mut SweepStats) {
        let stale: Vec<BookingId> = self
            .store
            .with_show(show_id, |_, state, now| {
                Ok(state
                    .bookings
                    .values()
                    .filter(|b| b.is_pending() && b.payment_deadline <= now)
                    .map(|b| b.id)
                    .collect())
            })
            .unwrap_or_default();

        for booking_id in stale {
            match self.bookings.cancel_booking(booking_id, CancelActor::System) {
                Ok(()) => {
                    info!(booking_id, show_id, "stale pending booking swept");
                    stats.bookings_cancelled += 1;
                }
                Err(BookingError::AlreadyFinalized) | Err(BookingError::NotFound(_)) => {
                    debug!(booking_id, "booking changed state since scan, skipping");
                }
                Err(e) => warn!(booking_id, "failed to sweep booking: {e}"),
            }
        }
    }

    /// Rule 2: expired holds not referenced by a live pending booking go
    /// back to free. Scan and reclaim happen under the same show lock, and
    /// the expiry is re-checked on each seat before it is flipped.
    fn reclaim_expired_holds(&self, show_id: ShowId, stats: &mut SweepStats) {
        let reclaimed = self
            .store
            .with_show(show_id, |_, state, now| {
                let expired: Vec<SeatId> = state
                    .seats
                    .values()
                    .filter(|s| {
                        matches!(&s.state, SeatState::Held { expires_at, .. } if *expires_at <= now)
                    })
                    .map(|s| s.id)
                    .collect();

                let mut reclaimed = 0usize;
                for seat_id in expired {
                    if state.pending_booking_for(seat_id).is_some() {
                        continue;
                    }
                    if let Some(seat) = state.seats.get_mut(&seat_id) {
                        if matches!(&seat.state, SeatState::Held { expires_at, .. } if *expires_at <= now)
                        {
                            seat.state = SeatState::Free;
                            reclaimed += 1;
                        }
                    }
                }
                Ok(reclaimed)
            })
            .unwrap_or(0);

        if reclaimed > 0 {
            info!(show_id, reclaimed, "expired holds reclaimed");
        }
        stats.holds_reclaimed += reclaimed;
    }

    /// Recurring background task; spawned once at startup.
    pub async fn run(self) {
        loop {
            tokio::time::sleep(self.interval).await;
            let stats = self.sweep_once();
            if stats.total() > 0 {
                info!(
                    bookings_cancelled = stats.bookings_cancelled,
                    holds_reclaimed = stats.holds_reclaimed,
                    "sweep completed"
                );
            }
        }
    }
}
