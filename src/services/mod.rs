pub mod booking;
pub mod notification;
pub mod payment;
pub mod reservation;
pub mod sweeper;

use std::collections::BTreeSet;

use crate::error::BookingError;
use crate::models::SeatId;

/// Rejects empty or duplicated seat sets and returns the ids in a canonical
/// order, so multi-seat operations behave deterministically.
pub(crate) fn unique_seat_ids(seat_ids: &[SeatId]) -> Result<Vec<SeatId>, BookingError> {
    if seat_ids.is_empty() {
        return Err(BookingError::InvalidRequest(
            "seat_ids must not be empty".to_string(),
        ));
    }
    let unique: BTreeSet<SeatId> = seat_ids.iter().copied().collect();
    if unique.len() != seat_ids.len() {
        return Err(BookingError::InvalidRequest(
            "seat_ids contains duplicates".to_string(),
        ));
    }
    Ok(unique.into_iter().collect())
}
