//! Outbound booking-confirmation notification.
//!
//! Fire-and-forget by contract: failures are logged, never propagated, and
//! never roll back a payment confirmation.

use std::sync::Arc;

use tracing::info;

use crate::catalog::Catalog;
use crate::models::{Booking, Seat, Show};

pub trait Notifier: Send + Sync {
    fn booking_confirmed(&self, booking: &Booking, show: &Show, seats: &[Seat]);
}

/// Renders the confirmation email and hands it to the (external) delivery
/// channel. Here that channel is the log; actual SMTP dispatch is an outside
/// collaborator.
pub struct EmailNotifier {
    catalog: Arc<Catalog>,
}

impl EmailNotifier {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn render(&self, booking: &Booking, show: &Show, seats: &[Seat]) -> String {
        let title = self
            .catalog
            .movie(show.movie_id)
            .map(|m| m.title.as_str())
            .unwrap_or("your movie");
        let seat_list = seats
            .iter()
            .map(Seat::label)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Your booking for {} at {} is confirmed. Seats: {}. Total: ${}.{:02}",
            title,
            show.start_time.format("%Y-%m-%d %H:%M"),
            seat_list,
            booking.total_amount_cents / 100,
            booking.total_amount_cents % 100,
        )
    }
}

impl Notifier for EmailNotifier {
    fn booking_confirmed(&self, booking: &Booking, show: &Show, seats: &[Seat]) {
        let message = self.render(booking, show, seats);
        info!(
            booking_id = booking.id,
            client_id = booking.client_id,
            token = %booking.confirmation_token,
            "confirmation dispatched: {message}"
        );
    }
}

/// No-op notifier for tests and tools that don't care about dispatch.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn booking_confirmed(&self, _: &Booking, _: &Show, _: &[Seat]) {}
}
