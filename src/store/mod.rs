//! Source of truth for seat and booking state.
//!
//! Each show's inventory (its seats and its bookings) lives behind one mutex,
//! so every mutation is an atomic, serializable transaction scoped to that
//! show. Operations on different shows never contend; operations overlapping
//! within a show serialize. Critical sections are short and never perform
//! I/O or await.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::BookingError;
use crate::models::{Booking, BookingId, Seat, SeatId, SeatState, Show, ShowId};

/// Mutable inventory of a single show, only ever touched under its lock.
pub struct ShowState {
    pub seats: BTreeMap<SeatId, Seat>,
    pub bookings: HashMap<BookingId, Booking>,
}

impl ShowState {
    /// The pending booking referencing a seat, if any. Seats under a pending
    /// booking are promoted past plain holds: they are not releasable and not
    /// reclaimable by the sweeper until the booking itself resolves.
    pub fn pending_booking_for(&self, seat_id: SeatId) -> Option<BookingId> {
        self.bookings
            .values()
            .find(|b| b.is_pending() && b.seat_ids.contains(&seat_id))
            .map(|b| b.id)
    }
}

struct ShowInventory {
    show: Show,
    state: Mutex<ShowState>,
}

pub struct InventoryStore {
    shows: RwLock<HashMap<ShowId, Arc<ShowInventory>>>,
    booking_index: RwLock<HashMap<BookingId, ShowId>>,
    token_index: RwLock<HashMap<Uuid, BookingId>>,
    next_seat_id: AtomicI64,
    next_booking_id: AtomicI64,
    clock: Arc<dyn Clock>,
}

impl InventoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            shows: RwLock::new(HashMap::new()),
            booking_index: RwLock::new(HashMap::new()),
            token_index: RwLock::new(HashMap::new()),
            next_seat_id: AtomicI64::new(1),
            next_booking_id: AtomicI64::new(1),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Loads a show and generates its seat layout. Seats exist for the
    /// lifetime of the show.
    pub fn add_show(&self, show: Show) {
        let mut seats = BTreeMap::new();
        for row in 0..show.rows {
            let label = Show::row_label(row);
            for number in 1..=show.seats_per_row {
                let id = self.next_seat_id.fetch_add(1, Ordering::Relaxed);
                seats.insert(
                    id,
                    Seat {
                        id,
                        row: label.clone(),
                        number,
                        state: SeatState::Free,
                    },
                );
            }
        }
        let inventory = Arc::new(ShowInventory {
            show,
            state: Mutex::new(ShowState {
                seats,
                bookings: HashMap::new(),
            }),
        });
        self.shows
            .write()
            .unwrap()
            .insert(inventory.show.id, inventory);
    }

    pub fn show_ids(&self) -> Vec<ShowId> {
        self.shows.read().unwrap().keys().copied().collect()
    }

    /// Runs `f` as a transaction over one show's inventory. The closure gets
    /// the immutable show, the locked mutable state and a single `now`
    /// snapshot; it must not block.
    pub fn with_show<T>(
        &self,
        show_id: ShowId,
        f: impl FnOnce(&Show, &mut ShowState, DateTime<Utc>) -> Result<T, BookingError>,
    ) -> Result<T, BookingError> {
        let inventory = {
            let shows = self.shows.read().unwrap();
            shows
                .get(&show_id)
                .cloned()
                .ok_or(BookingError::NotFound("show"))?
        };
        let now = self.clock.now();
        let mut state = inventory.state.lock().unwrap();
        f(&inventory.show, &mut state, now)
    }

    pub fn snapshot_seats(&self, show_id: ShowId) -> Result<Vec<Seat>, BookingError> {
        self.with_show(show_id, |_, state, _| {
            Ok(state.seats.values().cloned().collect())
        })
    }

    pub fn allocate_booking_id(&self) -> BookingId {
        self.next_booking_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Registers a freshly created booking in the global lookup indexes.
    pub fn index_booking(&self, booking_id: BookingId, show_id: ShowId, token: Uuid) {
        self.booking_index
            .write()
            .unwrap()
            .insert(booking_id, show_id);
        self.token_index.write().unwrap().insert(token, booking_id);
    }

    pub fn show_for_booking(&self, booking_id: BookingId) -> Option<ShowId> {
        self.booking_index.read().unwrap().get(&booking_id).copied()
    }

    pub fn booking_for_token(&self, token: Uuid) -> Option<BookingId> {
        self.token_index.read().unwrap().get(&token).copied()
    }
}
