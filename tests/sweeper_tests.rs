mod common;

use std::sync::Arc;

use chrono::Duration;
use movie_booking::error::BookingError;
use movie_booking::models::{BookingStatus, ClientId, SeatState};
use movie_booking::services::payment::PaymentService;
use movie_booking::services::sweeper::ExpirySweeper;

use common::{harness, seat_ids, seat_state, FakeGateway, PAYMENT_TIMEOUT_SECS, SHOW};

const ALICE: ClientId = 1;
const BOB: ClientId = 2;

#[test]
fn expired_hold_is_reclaimed() {
    let h = harness();
    let seat = seat_ids(&h, SHOW)[0];

    h.reservations
        .hold(SHOW, &[seat], ALICE, Some(Duration::seconds(1)))
        .unwrap();
    h.clock.advance(Duration::seconds(2));

    let stats = h.sweeper.sweep_once();
    assert_eq!(stats.holds_reclaimed, 1);
    assert_eq!(seat_state(&h, SHOW, seat), SeatState::Free);
}

#[test]
fn live_hold_survives_the_sweep() {
    let h = harness();
    let seat = seat_ids(&h, SHOW)[0];

    h.reservations.hold(SHOW, &[seat], ALICE, None).unwrap();
    h.clock.advance(Duration::seconds(10));

    let stats = h.sweeper.sweep_once();
    assert_eq!(stats.holds_reclaimed, 0);
    assert!(seat_state(&h, SHOW, seat).held_by(ALICE));
}

#[test]
fn rehold_before_sweep_is_not_clobbered() {
    let h = harness();
    let seat = seat_ids(&h, SHOW)[0];

    h.reservations
        .hold(SHOW, &[seat], ALICE, Some(Duration::seconds(1)))
        .unwrap();
    // Alice's hold expires, then Bob grabs the seat before the sweeper runs.
    h.clock.advance(Duration::seconds(2));
    h.reservations.hold(SHOW, &[seat], BOB, None).unwrap();

    let stats = h.sweeper.sweep_once();
    assert_eq!(stats.holds_reclaimed, 0);
    assert!(seat_state(&h, SHOW, seat).held_by(BOB));
}

#[test]
fn stale_pending_booking_is_cancelled_and_seats_freed() {
    let h = harness();
    let seats = seat_ids(&h, SHOW);
    let pair = &seats[..2];

    let booking = h.bookings.create_booking(SHOW, pair, ALICE).unwrap();
    h.clock
        .advance(Duration::seconds(PAYMENT_TIMEOUT_SECS + 1));

    let stats = h.sweeper.sweep_once();
    assert_eq!(stats.bookings_cancelled, 1);

    let swept = h.bookings.get_booking(booking.id).unwrap();
    assert_eq!(swept.status, BookingStatus::Cancelled);
    for &seat_id in pair {
        assert_eq!(seat_state(&h, SHOW, seat_id), SeatState::Free);
    }
    // Freed seats are immediately available again.
    h.reservations.hold(SHOW, pair, BOB, None).unwrap();
}

#[test]
fn pending_booking_within_deadline_is_untouched() {
    let h = harness();
    let seat = seat_ids(&h, SHOW)[0];

    let booking = h.bookings.create_booking(SHOW, &[seat], ALICE).unwrap();
    // Past the plain hold TTL, but the booking extended the hold to its
    // payment deadline.
    h.clock.advance(Duration::seconds(common::HOLD_TTL_SECS + 30));

    let stats = h.sweeper.sweep_once();
    assert_eq!(stats.total(), 0);
    assert_eq!(
        h.bookings.get_booking(booking.id).unwrap().status,
        BookingStatus::Pending
    );
    assert!(seat_state(&h, SHOW, seat).held_by(ALICE));
}

#[test]
fn paid_booking_is_never_swept() {
    let h = harness();
    let seat = seat_ids(&h, SHOW)[0];

    let booking = h.bookings.create_booking(SHOW, &[seat], ALICE).unwrap();
    h.bookings.confirm_payment(booking.id, "pay-1").unwrap();
    h.clock.advance(Duration::days(1));

    let stats = h.sweeper.sweep_once();
    assert_eq!(stats.total(), 0);
    assert_eq!(
        seat_state(&h, SHOW, seat),
        SeatState::Booked {
            booking_id: booking.id
        }
    );
}

#[test]
fn sweep_is_idempotent() {
    let h = harness();
    let seat = seat_ids(&h, SHOW)[0];

    h.bookings.create_booking(SHOW, &[seat], ALICE).unwrap();
    h.clock
        .advance(Duration::seconds(PAYMENT_TIMEOUT_SECS + 1));

    assert_eq!(h.sweeper.sweep_once().bookings_cancelled, 1);
    let second = h.sweeper.sweep_once();
    assert_eq!(second.total(), 0);
}

#[test]
fn late_webhook_after_sweep_cannot_resurrect_the_booking() {
    let h = harness();
    let seat = seat_ids(&h, SHOW)[0];

    let booking = h.bookings.create_booking(SHOW, &[seat], ALICE).unwrap();
    h.clock
        .advance(Duration::seconds(PAYMENT_TIMEOUT_SECS + 1));
    assert_eq!(h.sweeper.sweep_once().bookings_cancelled, 1);

    let err = h.bookings.confirm_payment(booking.id, "pay-late").unwrap_err();
    assert!(matches!(err, BookingError::AlreadyFinalized));
    assert_eq!(seat_state(&h, SHOW, seat), SeatState::Free);
}

#[tokio::test]
async fn abandoned_payment_sessions_are_pruned_once_the_booking_settles() {
    let h = harness();
    let seats = seat_ids(&h, SHOW);

    let payments = Arc::new(PaymentService::new(Arc::new(FakeGateway::new(false))));
    let sweeper = ExpirySweeper::new(
        h.store.clone(),
        h.bookings.clone(),
        std::time::Duration::from_secs(30),
    )
    .with_payments(payments.clone());

    let stale = h.bookings.create_booking(SHOW, &[seats[0]], ALICE).unwrap();
    let stale_session = payments.initiate(&stale, "stale".to_string()).await.unwrap();

    h.clock
        .advance(Duration::seconds(PAYMENT_TIMEOUT_SECS + 1));
    let live = h.bookings.create_booking(SHOW, &[seats[1]], BOB).unwrap();
    let live_session = payments.initiate(&live, "live".to_string()).await.unwrap();

    sweeper.sweep_once();

    // The swept booking's session is gone; the live one is untouched.
    assert_eq!(payments.take_session(&stale_session.session_id), None);
    assert_eq!(
        payments.take_session(&live_session.session_id),
        Some(live.id)
    );
}

#[test]
fn sweep_handles_mixed_state_in_one_pass() {
    let h = harness();
    let seats = seat_ids(&h, SHOW);

    // An expired hold, a live hold, and a stale pending booking.
    h.reservations
        .hold(SHOW, &[seats[0]], ALICE, Some(Duration::seconds(1)))
        .unwrap();
    h.bookings.create_booking(SHOW, &[seats[1]], BOB).unwrap();
    h.clock
        .advance(Duration::seconds(PAYMENT_TIMEOUT_SECS + 1));
    h.reservations.hold(SHOW, &[seats[2]], ALICE, None).unwrap();

    let stats = h.sweeper.sweep_once();
    assert_eq!(stats.holds_reclaimed, 1);
    assert_eq!(stats.bookings_cancelled, 1);
    assert_eq!(seat_state(&h, SHOW, seats[0]), SeatState::Free);
    assert_eq!(seat_state(&h, SHOW, seats[1]), SeatState::Free);
    assert!(seat_state(&h, SHOW, seats[2]).held_by(ALICE));
}
