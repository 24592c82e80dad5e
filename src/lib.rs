pub mod catalog;
pub mod clock;
pub mod config;
pub mod controllers;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use chrono::Duration;

use catalog::Catalog;
use clock::Clock;
use services::booking::BookingOrchestrator;
use services::notification::Notifier;
use services::payment::{PaymentGateway, PaymentService};
use services::reservation::ReservationEngine;
use store::InventoryStore;

/// Shared state for the whole application.
pub struct AppState {
    pub config: config::Config,
    pub catalog: Arc<Catalog>,
    pub store: Arc<InventoryStore>,
    pub reservations: ReservationEngine,
    pub bookings: BookingOrchestrator,
    pub payments: Arc<PaymentService>,
}

impl AppState {
    /// Wires the store, engines and adapters together and loads every
    /// catalog show into the inventory.
    pub fn new(
        config: config::Config,
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        let store = Arc::new(InventoryStore::new(clock));
        for show in catalog.all_shows() {
            store.add_show(show.clone());
        }

        let reservations = ReservationEngine::new(
            store.clone(),
            Duration::seconds(config.reservation.hold_ttl_seconds),
        );
        let bookings = BookingOrchestrator::new(
            store.clone(),
            notifier,
            Duration::seconds(config.reservation.payment_timeout_seconds),
        );
        let payments = Arc::new(PaymentService::new(gateway));

        Arc::new(Self {
            config,
            catalog,
            store,
            reservations,
            bookings,
            payments,
        })
    }
}
