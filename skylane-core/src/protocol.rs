//! Wire types for the seat allocation endpoints, shared by the inventory
//! server and the order service's HTTP client so both ends agree on the
//! payload shape.
//!
//! Every response carries an explicit `success` discriminator: HTTP status
//! codes alone cannot tell "flight sold out" apart from "inventory store
//! down", and the order orchestrator treats those two very differently.

use serde::{Deserialize, Serialize};
use crate::seat::Seat;

/// Reason code: the flight has no claimable seat. Final; not retryable.
pub const REASON_NO_SEATS: &str = "NO_SEATS_AVAILABLE";

/// Reason code: the seat store could not be reached. Transient; the whole
/// booking call may be retried because no side effect occurred.
pub const REASON_STORAGE: &str = "STORAGE_UNAVAILABLE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateSeatResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<Seat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AllocateSeatResponse {
    pub fn allocated(seat: Seat) -> Self {
        Self {
            success: true,
            seat: Some(seat),
            reason: None,
        }
    }

    pub fn denied(reason: &str) -> Self {
        Self {
            success: false,
            seat: None,
            reason: Some(reason.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSeatRequest {
    pub flight_number: String,
    pub seat_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatus {
    Released,
    AlreadyAvailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSeatResponse {
    pub success: bool,
    pub status: ReleaseStatus,
}
