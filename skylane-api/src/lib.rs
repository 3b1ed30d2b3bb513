use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod orders;
pub mod seats;
pub mod state;

pub use state::{AuthConfig, InventoryState, OrderState};

/// Router for the inventory service. The allocation endpoints are called
/// service-to-service by the order orchestrator.
pub fn inventory_app(state: InventoryState) -> Router {
    Router::new()
        .route("/api/seats/allocate/{flight_number}", post(seats::allocate_seat))
        .route("/api/seats/release", post(seats::release_seat))
        .route(
            "/api/seats/flight/{flight_number}/seat/{seat_number}",
            get(seats::get_seat),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router for the order service. Every route sits behind the JWT
/// middleware; handlers receive the caller as a [`RequestContext`]
/// extension.
///
/// [`RequestContext`]: skylane_core::context::RequestContext
pub fn order_app(state: OrderState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    Router::new()
        .route(
            "/api/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route("/api/orders/{order_number}", get(orders::get_order))
        .route(
            "/api/orders/{order_number}/cancel",
            post(orders::cancel_order),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::user_auth_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
