use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use skylane_api::{order_app, AuthConfig, OrderState};
use skylane_order::{HttpInventoryClient, LogReconciler, OrderOrchestrator};
use skylane_store::postgres::PgOrderRepository;
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
    tracing::info!("Starting order service on port {}", config.order_server.port);

    let pool = skylane_store::connect(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");

    let inventory_client = HttpInventoryClient::new(
        config.inventory_client.base_url.clone(),
        Duration::from_millis(config.inventory_client.timeout_ms),
    )
    .expect("Failed to build inventory client");

    let orchestrator = Arc::new(OrderOrchestrator::new(
        Arc::new(inventory_client),
        Arc::new(PgOrderRepository::new(pool)),
        Arc::new(LogReconciler),
    ));

    let app = order_app(OrderState {
        orchestrator,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.order_server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind order port");
    axum::serve(listener, app).await.expect("Order server exited");
}
