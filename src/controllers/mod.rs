pub mod bookings;
pub mod catalog;
pub mod payments;
pub mod seats;

use std::sync::Arc;

use axum::Router;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(catalog::routes())
        .merge(seats::routes())
        .merge(bookings::routes())
        .merge(payments::routes())
}
