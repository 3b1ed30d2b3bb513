//! Postgres stores. The claim flip is a conditional `UPDATE ... WHERE
//! is_available`, so the database resolves races between concurrent
//! claims: exactly one statement reports an affected row.
//!
//! See `schema.sql` at the crate root for the two tables these expect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use skylane_core::order::{Order, OrderStatus};
use skylane_core::repository::{
    OrderRepository, ReleaseOutcome, SeatStore, StoreError,
};
use skylane_core::seat::{Seat, SeatClass};

pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

#[derive(sqlx::FromRow)]
struct SeatRow {
    id: i64,
    flight_number: String,
    seat_number: String,
    seat_class: String,
    price_cents: i64,
    is_available: bool,
}

impl SeatRow {
    fn into_seat(self) -> Result<Seat, StoreError> {
        let seat_class = SeatClass::parse(&self.seat_class)
            .ok_or_else(|| format!("unknown seat class in row {}: {}", self.id, self.seat_class))?;
        Ok(Seat {
            id: self.id,
            flight_number: self.flight_number,
            seat_number: self.seat_number,
            seat_class,
            price_cents: self.price_cents,
            is_available: self.is_available,
        })
    }
}

pub struct PgSeatStore {
    pool: PgPool,
}

impl PgSeatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeatStore for PgSeatStore {
    async fn first_available(&self, flight_number: &str) -> Result<Option<Seat>, StoreError> {
        let row = sqlx::query_as::<_, SeatRow>(
            r#"
            SELECT id, flight_number, seat_number, seat_class, price_cents, is_available
            FROM seats
            WHERE flight_number = $1 AND is_available
            ORDER BY seat_number
            LIMIT 1
            "#,
        )
        .bind(flight_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SeatRow::into_seat).transpose()
    }

    async fn mark_unavailable_if_available(&self, seat_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE seats SET is_available = FALSE WHERE id = $1 AND is_available",
        )
        .bind(seat_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_available(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<ReleaseOutcome, StoreError> {
        let updated = sqlx::query(
            r#"
            UPDATE seats SET is_available = TRUE
            WHERE flight_number = $1 AND seat_number = $2 AND NOT is_available
            "#,
        )
        .bind(flight_number)
        .bind(seat_number)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 1 {
            return Ok(ReleaseOutcome::Released);
        }

        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM seats WHERE flight_number = $1 AND seat_number = $2",
        )
        .bind(flight_number)
        .bind(seat_number)
        .fetch_one(&self.pool)
        .await?;

        if exists > 0 {
            Ok(ReleaseOutcome::AlreadyAvailable)
        } else {
            Ok(ReleaseOutcome::NotFound)
        }
    }

    async fn find_seat(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<Option<Seat>, StoreError> {
        let row = sqlx::query_as::<_, SeatRow>(
            r#"
            SELECT id, flight_number, seat_number, seat_class, price_cents, is_available
            FROM seats
            WHERE flight_number = $1 AND seat_number = $2
            "#,
        )
        .bind(flight_number)
        .bind(seat_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SeatRow::into_seat).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_number: String,
    user_id: i64,
    flight_number: String,
    seat_number: String,
    amount_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, StoreError> {
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| format!("unknown order status in row {}: {}", self.id, self.status))?;
        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            flight_number: self.flight_number,
            seat_number: self.seat_number,
            amount_cents: self.amount_cents,
            status,
            created_at: self.created_at,
        })
    }
}

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO orders (order_number, user_id, flight_number, seat_number, amount_cents, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&order.order_number)
        .bind(order.user_id)
        .bind(&order.flight_number)
        .bind(&order.seat_number)
        .bind(order.amount_cents)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_order_status(
        &self,
        order_number: &str,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE order_number = $2",
        )
        .bind(status.as_str())
        .bind(order_number)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(format!("order {order_number} not found").into());
        }
        Ok(())
    }

    async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, order_number, user_id, flight_number, seat_number, amount_cents, status, created_at
            FROM orders
            WHERE order_number = $1
            "#,
        )
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, order_number, user_id, flight_number, seat_number, amount_cents, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }
}
