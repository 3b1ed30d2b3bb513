use serde::{Deserialize, Serialize};
use std::fmt;

/// Cabin class of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatClass {
    Economy,
    Business,
    First,
}

impl SeatClass {
    /// Lenient parse used at query boundaries; unknown values map to `None`
    /// rather than an error so optional filters degrade gracefully.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ECONOMY" => Some(SeatClass::Economy),
            "BUSINESS" => Some(SeatClass::Business),
            "FIRST" => Some(SeatClass::First),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::Economy => "ECONOMY",
            SeatClass::Business => "BUSINESS",
            SeatClass::First => "FIRST",
        }
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single seat on a flight. Identity is `(flight_number, seat_number)`;
/// the surrogate `id` exists for the conditional availability write.
///
/// Only the seat allocation engine mutates `is_available`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub flight_number: String,
    pub seat_number: String,
    pub seat_class: SeatClass,
    pub price_cents: i64,
    pub is_available: bool,
}

impl Seat {
    pub fn new(
        flight_number: impl Into<String>,
        seat_number: impl Into<String>,
        seat_class: SeatClass,
        price_cents: i64,
    ) -> Self {
        Self {
            id: 0,
            flight_number: flight_number.into(),
            seat_number: seat_number.into(),
            seat_class,
            price_cents,
            is_available: true,
        }
    }
}
