use std::sync::Arc;

use skylane_core::repository::{ReleaseOutcome, SeatStore, StoreError};
use skylane_core::seat::Seat;

use crate::policy::ClaimPolicy;

/// Business outcome of a claim. Distinct from [`AllocationError`]: a full
/// flight is a legitimate answer, a broken store is not.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    Claimed(Seat),
    NotAvailable,
}

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// The seat store could not serve the request. Callers must not
    /// interpret this as "sold out".
    #[error("seat store unavailable: {0}")]
    Store(String),
}

impl AllocationError {
    fn from_store(err: StoreError) -> Self {
        AllocationError::Store(err.to_string())
    }
}

/// Hands a seat on a flight to at most one caller.
///
/// Selection and write are two store calls, so the write is conditional:
/// it only succeeds if the seat is still available, and a lost race sends
/// the engine back to selection. The observable effect of a successful
/// claim is exactly one seat row flipping to unavailable.
pub struct SeatAllocationEngine {
    store: Arc<dyn SeatStore>,
    policy: ClaimPolicy,
}

impl SeatAllocationEngine {
    pub fn new(store: Arc<dyn SeatStore>, policy: ClaimPolicy) -> Self {
        Self { store, policy }
    }

    /// Claim the lowest-numbered available seat on `flight_number`.
    ///
    /// Returns `NotAvailable` when the flight has no claimable seat, and
    /// also when the bounded retry budget for contended writes runs out —
    /// either way the caller did not get a seat and nothing was mutated
    /// on their behalf.
    pub async fn claim_seat(&self, flight_number: &str) -> Result<ClaimOutcome, AllocationError> {
        for attempt in 0..self.policy.max_attempts {
            let candidate = self
                .store
                .first_available(flight_number)
                .await
                .map_err(AllocationError::from_store)?;

            let Some(candidate) = candidate else {
                return Ok(ClaimOutcome::NotAvailable);
            };

            let claimed = self
                .store
                .mark_unavailable_if_available(candidate.id)
                .await
                .map_err(AllocationError::from_store)?;

            if claimed {
                tracing::debug!(
                    flight = flight_number,
                    seat = %candidate.seat_number,
                    "seat claimed"
                );
                let mut seat = candidate;
                seat.is_available = false;
                return Ok(ClaimOutcome::Claimed(seat));
            }

            // Another claim consumed the candidate between selection and
            // write. Re-select after a short pause.
            tracing::debug!(
                flight = flight_number,
                seat = %candidate.seat_number,
                attempt,
                "lost claim race, re-selecting"
            );
            tokio::time::sleep(self.policy.backoff_for(attempt)).await;
        }

        tracing::warn!(
            flight = flight_number,
            attempts = self.policy.max_attempts,
            "claim retries exhausted under contention"
        );
        Ok(ClaimOutcome::NotAvailable)
    }

    /// Compensation hook: put a claimed seat back. Idempotent.
    pub async fn release_seat(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<ReleaseOutcome, AllocationError> {
        let outcome = self
            .store
            .mark_available(flight_number, seat_number)
            .await
            .map_err(AllocationError::from_store)?;

        match outcome {
            ReleaseOutcome::Released => {
                tracing::info!(flight = flight_number, seat = seat_number, "seat released");
            }
            ReleaseOutcome::AlreadyAvailable => {
                tracing::debug!(
                    flight = flight_number,
                    seat = seat_number,
                    "release was a no-op, seat already available"
                );
            }
            ReleaseOutcome::NotFound => {
                tracing::warn!(
                    flight = flight_number,
                    seat = seat_number,
                    "release requested for unknown seat"
                );
            }
        }
        Ok(outcome)
    }

    pub async fn find_seat(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<Option<Seat>, AllocationError> {
        self.store
            .find_seat(flight_number, seat_number)
            .await
            .map_err(AllocationError::from_store)
    }
}
