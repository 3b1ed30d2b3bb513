use async_trait::async_trait;
use crate::order::{Order, OrderStatus};
use crate::seat::Seat;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a release attempt. Releasing an already-available seat is a
/// no-op success, which is what makes the release safe to use as a
/// compensating action that may be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    AlreadyAvailable,
    NotFound,
}

/// Seat persistence as seen by the allocation engine.
///
/// `mark_unavailable_if_available` is the single conditional write the
/// whole claim protocol hangs on: it must flip availability atomically
/// and report `Ok(false)` when another claim consumed the seat between
/// the caller's selection and this write.
#[async_trait]
pub trait SeatStore: Send + Sync {
    /// Lowest seat number currently available on the flight, if any.
    async fn first_available(&self, flight_number: &str) -> Result<Option<Seat>, StoreError>;

    /// Atomic available -> unavailable transition. `Ok(false)` means the
    /// seat was no longer available (lost race or already claimed).
    async fn mark_unavailable_if_available(&self, seat_id: i64) -> Result<bool, StoreError>;

    /// Unavailable -> available transition, idempotent.
    async fn mark_available(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<ReleaseOutcome, StoreError>;

    async fn find_seat(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<Option<Seat>, StoreError>;
}

/// Order persistence as seen by the orchestrator. Order rows are written
/// by the orchestrator only; nothing else mutates them.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError>;

    async fn update_order_status(
        &self,
        order_number: &str,
        status: OrderStatus,
    ) -> Result<(), StoreError>;

    async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, StoreError>;

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError>;
}
