use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::task;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_booking::{
    catalog::Catalog,
    clock::SystemClock,
    config::Config,
    controllers,
    services::notification::EmailNotifier,
    services::payment::HttpPaymentGateway,
    services::sweeper::ExpirySweeper,
    AppState,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    config.validate().expect("invalid configuration");

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting movie booking API");

    let catalog = Arc::new(Catalog::seed());
    let gateway = Arc::new(HttpPaymentGateway::from_config(&config.payment));
    let notifier = Arc::new(EmailNotifier::new(catalog.clone()));

    let sweep_interval = Duration::from_secs(config.reservation.sweep_interval_seconds);
    let app_state = AppState::new(
        config.clone(),
        catalog,
        Arc::new(SystemClock),
        gateway,
        notifier,
    );
    info!(shows = app_state.store.show_ids().len(), "inventory loaded");

    // Background reclaim of expired holds and stale pending bookings.
    let sweeper = ExpirySweeper::new(
        app_state.store.clone(),
        app_state.bookings.clone(),
        sweep_interval,
    )
    .with_payments(app_state.payments.clone());
    task::spawn(sweeper.run());

    let app = Router::new()
        .route("/", get(|| async { "Movie Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(app_state.clone())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", app_state.config.app.host, app_state.config.app.port)
        .parse()
        .expect("invalid HOST/PORT");
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
