pub mod client;
pub mod orchestrator;
pub mod reconcile;

pub use client::{ClientError, HttpInventoryClient, SeatAllocationClient, SeatRequestOutcome};
pub use orchestrator::{CreateOrderError, OrderAccessError, OrderOrchestrator};
pub use reconcile::{LogReconciler, ReconciliationRecord, ReconciliationSink};
