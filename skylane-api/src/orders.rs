use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skylane_core::context::RequestContext;
use skylane_core::order::{Order, OrderStatus};
use skylane_order::{CreateOrderError, OrderAccessError};

use crate::error::AppError;
use crate::state::OrderState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub flight_number: String,
    pub amount_cents: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_number: String,
    pub flight_number: String,
    pub seat_number: String,
    pub amount_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_number: order.order_number,
            flight_number: order.flight_number,
            seat_number: order.seat_number,
            amount_cents: order.amount_cents,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/orders
///
/// The seat is always chosen by the inventory service's claim endpoint;
/// the request body never names one.
pub async fn create_order(
    State(state): State<OrderState>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    if req.flight_number.trim().is_empty() {
        return Err(AppError::BadRequest("flight_number is required".into()));
    }
    if req.amount_cents < 0 {
        return Err(AppError::BadRequest("amount_cents must not be negative".into()));
    }

    let order = state
        .orchestrator
        .create_order(ctx, &req.flight_number, req.amount_cents)
        .await
        .map_err(|err| match err {
            CreateOrderError::NoSeatsLeft(flight) => {
                AppError::Conflict(format!("no seats left on flight {flight}"))
            }
            CreateOrderError::AllocationUnreachable => {
                AppError::BadGateway("seat allocation service unreachable".into())
            }
            CreateOrderError::OrderPersistFailed => {
                AppError::InternalServerError("order could not be persisted".into())
            }
            CreateOrderError::Internal(cause) => AppError::InternalServerError(cause),
        })?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /api/orders/{order_number}
pub async fn get_order(
    State(state): State<OrderState>,
    Extension(ctx): Extension<RequestContext>,
    Path(order_number): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .orchestrator
        .get_order(ctx, &order_number)
        .await
        .map_err(access_error)?;
    Ok(Json(order.into()))
}

/// GET /api/orders
pub async fn list_orders(
    State(state): State<OrderState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state
        .orchestrator
        .list_orders(ctx)
        .await
        .map_err(access_error)?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// POST /api/orders/{order_number}/cancel
pub async fn cancel_order(
    State(state): State<OrderState>,
    Extension(ctx): Extension<RequestContext>,
    Path(order_number): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .orchestrator
        .cancel_order(ctx, &order_number)
        .await
        .map_err(access_error)?;
    Ok(Json(order.into()))
}

fn access_error(err: OrderAccessError) -> AppError {
    match err {
        OrderAccessError::NotFound => AppError::NotFound("order not found".into()),
        OrderAccessError::Forbidden => {
            AppError::Forbidden("order belongs to a different user".into())
        }
        OrderAccessError::Store(cause) => AppError::InternalServerError(cause),
    }
}
