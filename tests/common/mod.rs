//! Shared fixtures: a store seeded with one small show, driven by a manual
//! clock so tests advance time explicitly instead of sleeping.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use movie_booking::clock::ManualClock;
use movie_booking::models::{Seat, SeatId, SeatState, Show, ShowId};
use movie_booking::services::booking::BookingOrchestrator;
use movie_booking::services::notification::NullNotifier;
use movie_booking::services::payment::{
    GatewayError, PaymentGateway, PaymentSession, PaymentSessionRequest,
};
use movie_booking::services::reservation::ReservationEngine;
use movie_booking::services::sweeper::ExpirySweeper;
use movie_booking::store::InventoryStore;

pub const HOLD_TTL_SECS: i64 = 120;
pub const PAYMENT_TIMEOUT_SECS: i64 = 300;
pub const PRICE_CENTS: i64 = 250;
pub const SHOW: ShowId = 1;

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub store: Arc<InventoryStore>,
    pub reservations: ReservationEngine,
    pub bookings: BookingOrchestrator,
    pub sweeper: ExpirySweeper,
}

pub fn show(id: ShowId, price_cents: i64) -> Show {
    Show {
        id,
        movie_id: 1,
        theater_id: 1,
        start_time: Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap(),
        price_cents,
        rows: 2,
        seats_per_row: 5,
    }
}

pub fn harness() -> Harness {
    let clock = Arc::new(ManualClock::starting_at(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ));
    let store = Arc::new(InventoryStore::new(clock.clone()));
    store.add_show(show(SHOW, PRICE_CENTS));

    let reservations = ReservationEngine::new(store.clone(), Duration::seconds(HOLD_TTL_SECS));
    let bookings = BookingOrchestrator::new(
        store.clone(),
        Arc::new(NullNotifier),
        Duration::seconds(PAYMENT_TIMEOUT_SECS),
    );
    let sweeper = ExpirySweeper::new(
        store.clone(),
        bookings.clone(),
        std::time::Duration::from_secs(30),
    );

    Harness {
        clock,
        store,
        reservations,
        bookings,
        sweeper,
    }
}

pub fn seat_ids(harness: &Harness, show_id: ShowId) -> Vec<SeatId> {
    harness
        .store
        .snapshot_seats(show_id)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect()
}

pub fn seat(harness: &Harness, show_id: ShowId, seat_id: SeatId) -> Seat {
    harness
        .store
        .snapshot_seats(show_id)
        .unwrap()
        .into_iter()
        .find(|s| s.id == seat_id)
        .expect("seat should exist")
}

pub fn seat_state(harness: &Harness, show_id: ShowId, seat_id: SeatId) -> SeatState {
    seat(harness, show_id, seat_id).state
}

/// Gateway double: hands out deterministic sessions, or rejects everything
/// when constructed with `fail`.
pub struct FakeGateway {
    pub calls: AtomicUsize,
    fail: bool,
}

impl FakeGateway {
    pub fn new(fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }
}

impl PaymentGateway for FakeGateway {
    fn create_payment_session(
        &self,
        request: PaymentSessionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PaymentSession, GatewayError>> + Send + '_>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                return Err(GatewayError::Rejected("declined".to_string()));
            }
            Ok(PaymentSession {
                session_id: format!("session-{}-{}", request.order_id, call),
                payment_url: format!("https://pay.example.com/{}", request.order_id),
            })
        })
    }
}
