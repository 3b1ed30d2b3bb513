use std::sync::Arc;

use skylane_inventory::SeatAllocationEngine;
use skylane_order::OrderOrchestrator;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct InventoryState {
    pub engine: Arc<SeatAllocationEngine>,
}

#[derive(Clone)]
pub struct OrderState {
    pub orchestrator: Arc<OrderOrchestrator>,
    pub auth: AuthConfig,
}
