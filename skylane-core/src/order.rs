use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle: PENDING -> CONFIRMED -> CANCELLED.
///
/// An order only reaches CONFIRMED once its seat claim is known durable;
/// a CONFIRMED order therefore always corresponds to exactly one
/// unavailable seat on the same flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(OrderStatus::Pending),
            "CONFIRMED" => Some(OrderStatus::Confirmed),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Legal lifecycle transitions.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Confirmed, OrderStatus::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booking for one seat on one flight, owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub user_id: i64,
    pub flight_number: String,
    pub seat_number: String,
    pub amount_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// A fresh PENDING order referencing an already-claimed seat.
    pub fn new(
        order_number: impl Into<String>,
        user_id: i64,
        flight_number: impl Into<String>,
        seat_number: impl Into<String>,
        amount_cents: i64,
    ) -> Self {
        Self {
            id: 0,
            order_number: order_number.into(),
            user_id,
            flight_number: flight_number.into(),
            seat_number: seat_number.into(),
            amount_cents,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
