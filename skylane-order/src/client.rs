//! HTTP client for the inventory service's allocation endpoints.
//!
//! The one rule that matters here: "the remote said no seats" and "the
//! remote could not be reached" are different answers. The first is final;
//! the second left no side effect and the whole booking call may be
//! retried. Collapsing them would either deny bookings on a hiccup or
//! retry a request the remote already accepted.

use async_trait::async_trait;
use std::time::Duration;

use skylane_core::protocol::{
    AllocateSeatResponse, ReleaseSeatRequest, ReleaseSeatResponse, REASON_NO_SEATS,
};
use skylane_core::seat::Seat;

#[derive(Debug, Clone, PartialEq)]
pub enum SeatRequestOutcome {
    Allocated(Seat),
    NotAvailable,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure: timeout, connect error, 5xx, or a body
    /// that does not parse as the protocol shape. Safe to retry the
    /// enclosing operation.
    #[error("inventory service unreachable: {0}")]
    Unreachable(String),
}

#[async_trait]
pub trait SeatAllocationClient: Send + Sync {
    async fn request_seat(&self, flight_number: &str)
        -> Result<SeatRequestOutcome, ClientError>;

    async fn release_seat(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<(), ClientError>;
}

pub struct HttpInventoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpInventoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl SeatAllocationClient for HttpInventoryClient {
    async fn request_seat(
        &self,
        flight_number: &str,
    ) -> Result<SeatRequestOutcome, ClientError> {
        let url = format!("{}/api/seats/allocate/{}", self.base_url, flight_number);
        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ClientError::Unreachable(format!(
                "inventory returned {status}"
            )));
        }

        let body: AllocateSeatResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Unreachable(format!("malformed allocation body: {e}")))?;

        if body.success {
            return body
                .seat
                .map(SeatRequestOutcome::Allocated)
                .ok_or_else(|| {
                    ClientError::Unreachable("allocation succeeded without a seat payload".into())
                });
        }

        match body.reason.as_deref() {
            Some(REASON_NO_SEATS) => Ok(SeatRequestOutcome::NotAvailable),
            reason => Err(ClientError::Unreachable(format!(
                "allocation refused: {}",
                reason.unwrap_or("no reason given")
            ))),
        }
    }

    async fn release_seat(
        &self,
        flight_number: &str,
        seat_number: &str,
    ) -> Result<(), ClientError> {
        let url = format!("{}/api/seats/release", self.base_url);
        let request = ReleaseSeatRequest {
            flight_number: flight_number.to_string(),
            seat_number: seat_number.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Unreachable(format!(
                "release returned {status}"
            )));
        }

        let body: ReleaseSeatResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Unreachable(format!("malformed release body: {e}")))?;

        // RELEASED and ALREADY_AVAILABLE both mean the seat is back.
        if body.success {
            Ok(())
        } else {
            Err(ClientError::Unreachable("release refused".into()))
        }
    }
}
