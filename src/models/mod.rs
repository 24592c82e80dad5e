pub mod booking;
pub mod seat;
pub mod show;

pub use booking::{Booking, BookingStatus};
pub use seat::{Seat, SeatState};
pub use show::{Movie, Show, Theater};

// Opaque stable identifiers. Integers everywhere except the public
// confirmation token, which is a UUID.
pub type MovieId = i64;
pub type TheaterId = i64;
pub type ShowId = i64;
pub type SeatId = i64;
pub type BookingId = i64;
pub type ClientId = i64;
