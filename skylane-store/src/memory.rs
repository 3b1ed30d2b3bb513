//! In-memory stores backed by a `Mutex`. The test suites and local
//! single-process runs use these; the service binaries wire the Postgres
//! stores instead.
//!
//! Atomicity of the conditional claim write falls out of the mutex: the
//! check and the flip happen under one lock acquisition.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use skylane_core::order::{Order, OrderStatus};
use skylane_core::repository::{
    OrderRepository, ReleaseOutcome, SeatStore, StoreError,
};
use skylane_core::seat::Seat;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex.lock().map_err(|_| "store lock poisoned".into())
}

pub struct MemorySeatStore {
    seats: Mutex<Vec<Seat>>,
}

impl MemorySeatStore {
    pub fn new() -> Self {
        Self {
            seats: Mutex::new(Vec::new()),
        }
    }

    /// Provision a seat, assigning its row id. Panics only on a poisoned
    /// lock, which cannot happen during single-threaded seeding.
    pub fn add_seat(&self, mut seat: Seat) -> i64 {
        let mut seats = self.seats.lock().expect("seat store lock poisoned");
        let id = seats.len() as i64 + 1;
        seat.id = id;
        seats.push(seat);
        id
    }
}

impl Default for MemorySeatStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeatStore for MemorySeatStore {
    async fn first_available(&self, flight_number: &str) -> Result<Option<Seat>, StoreError> {
        let seats = lock(&self.seats)?;
        Ok(seats
            .iter()
            .filter(|s| s.flight_number == flight_number && s.is_available)
            .min_by(|a, b| a.seat_number.cmp(&b.seat_number))
            .cloned())
    }

    async fn mark_unavailable_if_available(&self, seat_id: i64) -> Result<bool, StoreError> {
        let mut seats = lock(&self.seats)?;
        match seats.iter_mut().find(|s| s.id == seat_id) {
            Some(seat) if seat.is_available => {
                seat.is_available = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_available(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<ReleaseOutcome, StoreError> {
        let mut seats = lock(&self.seats)?;
        match seats
            .iter_mut()
            .find(|s| s.flight_number == flight_number && s.seat_number == seat_number)
        {
            None => Ok(ReleaseOutcome::NotFound),
            Some(seat) if seat.is_available => Ok(ReleaseOutcome::AlreadyAvailable),
            Some(seat) => {
                seat.is_available = true;
                Ok(ReleaseOutcome::Released)
            }
        }
    }

    async fn find_seat(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<Option<Seat>, StoreError> {
        let seats = lock(&self.seats)?;
        Ok(seats
            .iter()
            .find(|s| s.flight_number == flight_number && s.seat_number == seat_number)
            .cloned())
    }
}

pub struct MemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = lock(&self.orders)?;
        if orders
            .iter()
            .any(|o| o.order_number == order.order_number)
        {
            return Err(format!("duplicate order number {}", order.order_number).into());
        }
        let mut order = order.clone();
        order.id = orders.len() as i64 + 1;
        orders.push(order);
        Ok(())
    }

    async fn update_order_status(
        &self,
        order_number: &str,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        let mut orders = lock(&self.orders)?;
        let order = orders
            .iter_mut()
            .find(|o| o.order_number == order_number)
            .ok_or_else(|| format!("order {order_number} not found"))?;
        order.status = status;
        Ok(())
    }

    async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, StoreError> {
        let orders = lock(&self.orders)?;
        Ok(orders
            .iter()
            .find(|o| o.order_number == order_number)
            .cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        let orders = lock(&self.orders)?;
        let mut matched: Vec<Order> = orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }
}
