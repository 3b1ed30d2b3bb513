use async_trait::async_trait;

/// A claimed-but-unordered seat discovered when the compensating release
/// itself failed. The pair of stores is now inconsistent and only an
/// out-of-band repair can fix it, so the record must not be lost.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationRecord {
    pub order_number: String,
    pub flight_number: String,
    pub seat_number: String,
    pub cause: String,
}

#[async_trait]
pub trait ReconciliationSink: Send + Sync {
    async fn escalate(&self, record: ReconciliationRecord);
}

/// Default sink: a structured error-level log line that a repair job or
/// alert can pick up.
pub struct LogReconciler;

#[async_trait]
impl ReconciliationSink for LogReconciler {
    async fn escalate(&self, record: ReconciliationRecord) {
        tracing::error!(
            order_number = %record.order_number,
            flight = %record.flight_number,
            seat = %record.seat_number,
            cause = %record.cause,
            "seat release failed after order persistence failure; manual reconciliation required"
        );
    }
}
