use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use skylane_api::{inventory_app, InventoryState};
use skylane_inventory::{ClaimPolicy, SeatAllocationEngine};
use skylane_store::postgres::PgSeatStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skylane=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = skylane_store::Config::load().expect("Failed to load config");
    tracing::info!(
        "Starting inventory service on port {}",
        config.inventory_server.port
    );

    let pool = skylane_store::connect(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");

    let policy = ClaimPolicy {
        max_attempts: config.claim.max_attempts,
        base_backoff: Duration::from_millis(config.claim.base_backoff_ms),
        max_backoff: Duration::from_millis(config.claim.max_backoff_ms),
    };
    let engine = Arc::new(SeatAllocationEngine::new(
        Arc::new(PgSeatStore::new(pool)),
        policy,
    ));

    let app = inventory_app(InventoryState { engine });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.inventory_server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind inventory port");
    axum::serve(listener, app)
        .await
        .expect("Inventory server exited");
}
