use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use skylane_core::protocol::{
    AllocateSeatResponse, ReleaseSeatRequest, ReleaseSeatResponse, ReleaseStatus,
    REASON_NO_SEATS, REASON_STORAGE,
};
use skylane_core::repository::ReleaseOutcome;
use skylane_core::seat::Seat;
use skylane_inventory::{AllocationError, ClaimOutcome};

use crate::error::AppError;
use crate::state::InventoryState;

/// POST /api/seats/allocate/{flight_number}
///
/// Sold out and storage-down both come back with `success: false`, but on
/// different status codes and reason codes: the order service retries one
/// and not the other.
pub async fn allocate_seat(
    State(state): State<InventoryState>,
    Path(flight_number): Path<String>,
) -> (StatusCode, Json<AllocateSeatResponse>) {
    match state.engine.claim_seat(&flight_number).await {
        Ok(ClaimOutcome::Claimed(seat)) => {
            (StatusCode::OK, Json(AllocateSeatResponse::allocated(seat)))
        }
        Ok(ClaimOutcome::NotAvailable) => (
            StatusCode::OK,
            Json(AllocateSeatResponse::denied(REASON_NO_SEATS)),
        ),
        Err(AllocationError::Store(cause)) => {
            tracing::error!(
                flight = %flight_number,
                cause = %cause,
                "seat store unavailable during allocation"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(AllocateSeatResponse::denied(REASON_STORAGE)),
            )
        }
    }
}

/// POST /api/seats/release
pub async fn release_seat(
    State(state): State<InventoryState>,
    Json(req): Json<ReleaseSeatRequest>,
) -> Result<Json<ReleaseSeatResponse>, AppError> {
    match state
        .engine
        .release_seat(&req.flight_number, &req.seat_number)
        .await
    {
        Ok(ReleaseOutcome::Released) => Ok(Json(ReleaseSeatResponse {
            success: true,
            status: ReleaseStatus::Released,
        })),
        Ok(ReleaseOutcome::AlreadyAvailable) => Ok(Json(ReleaseSeatResponse {
            success: true,
            status: ReleaseStatus::AlreadyAvailable,
        })),
        Ok(ReleaseOutcome::NotFound) => Err(AppError::NotFound(format!(
            "seat {} on flight {}",
            req.seat_number, req.flight_number
        ))),
        Err(AllocationError::Store(cause)) => Err(AppError::ServiceUnavailable(cause)),
    }
}

/// GET /api/seats/flight/{flight_number}/seat/{seat_number}
pub async fn get_seat(
    State(state): State<InventoryState>,
    Path((flight_number, seat_number)): Path<(String, String)>,
) -> Result<Json<Seat>, AppError> {
    let seat = state
        .engine
        .find_seat(&flight_number, &seat_number)
        .await
        .map_err(|AllocationError::Store(cause)| AppError::ServiceUnavailable(cause))?
        .ok_or_else(|| {
            AppError::NotFound(format!("seat {seat_number} on flight {flight_number}"))
        })?;
    Ok(Json(seat))
}
