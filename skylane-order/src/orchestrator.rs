//! Order creation as a two-step saga.
//!
//! The seat store and the order store are owned by different services and
//! never share a transaction, so consistency is by protocol: claim the
//! seat first, then persist the order; if the order cannot be persisted,
//! release the seat. The invariant at the end of every path is "a
//! confirmed order exists if and only if its seat is unavailable".

use std::sync::Arc;

use skylane_core::context::RequestContext;
use skylane_core::identity;
use skylane_core::order::{Order, OrderStatus};
use skylane_core::repository::OrderRepository;

use crate::client::{ClientError, SeatAllocationClient, SeatRequestOutcome};
use crate::reconcile::{ReconciliationRecord, ReconciliationSink};

#[derive(Debug, thiserror::Error)]
pub enum CreateOrderError {
    /// Business outcome: the flight has no claimable seat. Not retried by
    /// the system; the client may simply try another flight.
    #[error("no seats left on flight {0}")]
    NoSeatsLeft(String),

    /// Transient: the allocation call never produced a final answer. No
    /// side effect occurred, so the caller may retry the whole request.
    #[error("seat allocation service unreachable")]
    AllocationUnreachable,

    /// The order store failed after a successful claim. Compensation has
    /// run (or been escalated); no confirmed order exists.
    #[error("order could not be persisted")]
    OrderPersistFailed,

    #[error("orchestration failure: {0}")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum OrderAccessError {
    #[error("order not found")]
    NotFound,

    #[error("order belongs to a different user")]
    Forbidden,

    #[error("order store failure: {0}")]
    Store(String),
}

pub struct OrderOrchestrator {
    allocator: Arc<dyn SeatAllocationClient>,
    orders: Arc<dyn OrderRepository>,
    reconciler: Arc<dyn ReconciliationSink>,
}

impl OrderOrchestrator {
    pub fn new(
        allocator: Arc<dyn SeatAllocationClient>,
        orders: Arc<dyn OrderRepository>,
        reconciler: Arc<dyn ReconciliationSink>,
    ) -> Self {
        Self {
            allocator,
            orders,
            reconciler,
        }
    }

    /// Book one seat on `flight_number` for the calling user.
    ///
    /// The saga body runs on its own task: a caller that drops the
    /// request future mid-flight must not strand a claimed seat between
    /// the claim and its compensating release.
    pub async fn create_order(
        &self,
        ctx: RequestContext,
        flight_number: &str,
        amount_cents: i64,
    ) -> Result<Order, CreateOrderError> {
        let allocator = Arc::clone(&self.allocator);
        let orders = Arc::clone(&self.orders);
        let reconciler = Arc::clone(&self.reconciler);
        let flight = flight_number.to_string();

        tokio::spawn(run_create(
            allocator,
            orders,
            reconciler,
            ctx,
            flight,
            amount_cents,
        ))
        .await
        .map_err(|e| CreateOrderError::Internal(e.to_string()))?
    }

    pub async fn get_order(
        &self,
        ctx: RequestContext,
        order_number: &str,
    ) -> Result<Order, OrderAccessError> {
        let order = self
            .orders
            .find_by_order_number(order_number)
            .await
            .map_err(|e| OrderAccessError::Store(e.to_string()))?
            .ok_or(OrderAccessError::NotFound)?;

        if order.user_id != ctx.user_id {
            return Err(OrderAccessError::Forbidden);
        }
        Ok(order)
    }

    pub async fn list_orders(&self, ctx: RequestContext) -> Result<Vec<Order>, OrderAccessError> {
        self.orders
            .list_by_user(ctx.user_id)
            .await
            .map_err(|e| OrderAccessError::Store(e.to_string()))
    }

    /// Cancel an order and put its seat back. Idempotent: cancelling an
    /// already-cancelled order is a no-op success.
    ///
    /// Spawned for the same reason as [`create_order`]: once the row is
    /// CANCELLED the seat release must still run even if the caller drops
    /// the request future between the two steps.
    ///
    /// [`create_order`]: OrderOrchestrator::create_order
    pub async fn cancel_order(
        &self,
        ctx: RequestContext,
        order_number: &str,
    ) -> Result<Order, OrderAccessError> {
        let allocator = Arc::clone(&self.allocator);
        let orders = Arc::clone(&self.orders);
        let reconciler = Arc::clone(&self.reconciler);

        tokio::spawn(run_cancel(
            allocator,
            orders,
            reconciler,
            ctx,
            order_number.to_string(),
        ))
        .await
        .map_err(|e| OrderAccessError::Store(e.to_string()))?
    }
}

async fn run_cancel(
    allocator: Arc<dyn SeatAllocationClient>,
    orders: Arc<dyn OrderRepository>,
    reconciler: Arc<dyn ReconciliationSink>,
    ctx: RequestContext,
    order_number: String,
) -> Result<Order, OrderAccessError> {
    let mut order = orders
        .find_by_order_number(&order_number)
        .await
        .map_err(|e| OrderAccessError::Store(e.to_string()))?
        .ok_or(OrderAccessError::NotFound)?;

    if order.user_id != ctx.user_id {
        return Err(OrderAccessError::Forbidden);
    }

    if order.status == OrderStatus::Cancelled {
        return Ok(order);
    }

    orders
        .update_order_status(&order.order_number, OrderStatus::Cancelled)
        .await
        .map_err(|e| OrderAccessError::Store(e.to_string()))?;
    order.status = OrderStatus::Cancelled;

    release_or_escalate(&*allocator, &*reconciler, &order).await;

    tracing::info!(
        order_number = %order.order_number,
        flight = %order.flight_number,
        seat = %order.seat_number,
        "order cancelled"
    );
    Ok(order)
}

async fn run_create(
    allocator: Arc<dyn SeatAllocationClient>,
    orders: Arc<dyn OrderRepository>,
    reconciler: Arc<dyn ReconciliationSink>,
    ctx: RequestContext,
    flight: String,
    amount_cents: i64,
) -> Result<Order, CreateOrderError> {
    // Step 1: claim a seat. A final "no" and an unreachable remote are
    // different answers; only the latter leaves the caller free to retry.
    let seat = match allocator.request_seat(&flight).await {
        Ok(SeatRequestOutcome::Allocated(seat)) => seat,
        Ok(SeatRequestOutcome::NotAvailable) => {
            return Err(CreateOrderError::NoSeatsLeft(flight));
        }
        Err(ClientError::Unreachable(cause)) => {
            tracing::warn!(flight = %flight, cause = %cause, "seat allocation unreachable");
            return Err(CreateOrderError::AllocationUnreachable);
        }
    };

    // Step 2: persist the order, then confirm it. From here on, any
    // failure owes the inventory service a release.
    let mut order = Order::new(
        identity::generate_order_number(),
        ctx.user_id,
        flight,
        seat.seat_number.clone(),
        amount_cents,
    );

    if let Err(err) = orders.insert_order(&order).await {
        tracing::error!(
            order_number = %order.order_number,
            cause = %err,
            "order insert failed after seat claim, compensating"
        );
        release_or_escalate(&*allocator, &*reconciler, &order).await;
        return Err(CreateOrderError::OrderPersistFailed);
    }

    if let Err(err) = orders
        .update_order_status(&order.order_number, OrderStatus::Confirmed)
        .await
    {
        tracing::error!(
            order_number = %order.order_number,
            cause = %err,
            "order confirmation failed, compensating"
        );
        // Leave no half-open PENDING row behind before releasing.
        if let Err(cancel_err) = orders
            .update_order_status(&order.order_number, OrderStatus::Cancelled)
            .await
        {
            tracing::error!(
                order_number = %order.order_number,
                cause = %cancel_err,
                "could not cancel pending order after failed confirmation"
            );
        }
        release_or_escalate(&*allocator, &*reconciler, &order).await;
        return Err(CreateOrderError::OrderPersistFailed);
    }

    order.status = OrderStatus::Confirmed;
    tracing::info!(
        order_number = %order.order_number,
        flight = %order.flight_number,
        seat = %order.seat_number,
        user_id = order.user_id,
        "order confirmed"
    );
    Ok(order)
}

/// Run the compensating release. A failed release leaves a seat claimed
/// with no order behind it; that inconsistency is escalated, never
/// swallowed.
async fn release_or_escalate(
    allocator: &dyn SeatAllocationClient,
    reconciler: &dyn ReconciliationSink,
    order: &Order,
) {
    if let Err(ClientError::Unreachable(cause)) = allocator
        .release_seat(&order.flight_number, &order.seat_number)
        .await
    {
        reconciler
            .escalate(ReconciliationRecord {
                order_number: order.order_number.clone(),
                flight_number: order.flight_number.clone(),
                seat_number: order.seat_number.clone(),
                cause,
            })
            .await;
    }
}
