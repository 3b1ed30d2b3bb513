//! End-to-end saga tests: a real inventory router on a loopback socket,
//! the real HTTP client, and the orchestrator driving both stores.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use skylane_api::{inventory_app, InventoryState};
use skylane_core::context::RequestContext;
use skylane_core::order::{Order, OrderStatus};
use skylane_core::protocol::AllocateSeatResponse;
use skylane_core::repository::{OrderRepository, StoreError};
use skylane_core::seat::{Seat, SeatClass};
use skylane_inventory::{ClaimPolicy, SeatAllocationEngine};
use skylane_order::{
    CreateOrderError, HttpInventoryClient, LogReconciler, OrderOrchestrator,
};
use skylane_store::memory::{MemoryOrderRepository, MemorySeatStore};

fn fast_policy() -> ClaimPolicy {
    ClaimPolicy {
        max_attempts: 8,
        base_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
    }
}

async fn spawn_inventory(store: Arc<MemorySeatStore>) -> String {
    let engine = Arc::new(SeatAllocationEngine::new(store, fast_policy()));
    let app = inventory_app(InventoryState { engine });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn inventory_client(base_url: &str) -> HttpInventoryClient {
    HttpInventoryClient::new(base_url, Duration::from_millis(1000)).unwrap()
}

fn orchestrator(
    base_url: &str,
    orders: Arc<MemoryOrderRepository>,
) -> OrderOrchestrator {
    OrderOrchestrator::new(
        Arc::new(inventory_client(base_url)),
        orders,
        Arc::new(LogReconciler),
    )
}

const ALICE: RequestContext = RequestContext { user_id: 1 };
const BOB: RequestContext = RequestContext { user_id: 2 };

#[tokio::test]
async fn booking_round_trip_flips_and_restores_availability() {
    let store = Arc::new(MemorySeatStore::new());
    store.add_seat(Seat::new("CA1234", "12A", SeatClass::Economy, 52000));
    let base = spawn_inventory(Arc::clone(&store)).await;

    let orders = Arc::new(MemoryOrderRepository::new());
    let orch = orchestrator(&base, Arc::clone(&orders));

    let order = orch.create_order(ALICE, "CA1234", 52000).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.seat_number, "12A");

    // The claimed seat reads back unavailable over the wire.
    let http = reqwest::Client::new();
    let seat: Seat = http
        .get(format!("{base}/api/seats/flight/CA1234/seat/12A"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!seat.is_available);

    // Cancelling puts it back.
    orch.cancel_order(ALICE, &order.order_number).await.unwrap();
    let seat: Seat = http
        .get(format!("{base}/api/seats/flight/CA1234/seat/12A"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(seat.is_available);
}

#[tokio::test]
async fn last_seat_goes_to_exactly_one_of_two_simultaneous_bookings() {
    let store = Arc::new(MemorySeatStore::new());
    store.add_seat(Seat::new("CA1234", "2A", SeatClass::Business, 180000));
    let base = spawn_inventory(store).await;

    let orders = Arc::new(MemoryOrderRepository::new());
    let orch = Arc::new(orchestrator(&base, Arc::clone(&orders)));

    let first = {
        let orch = Arc::clone(&orch);
        tokio::spawn(async move { orch.create_order(ALICE, "CA1234", 180000).await })
    };
    let second = {
        let orch = Arc::clone(&orch);
        tokio::spawn(async move { orch.create_order(BOB, "CA1234", 180000).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];

    let confirmed: Vec<&Order> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].seat_number, "2A");
    assert_eq!(confirmed[0].status, OrderStatus::Confirmed);

    let denied: Vec<_> = results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .collect();
    assert_eq!(denied.len(), 1);
    assert!(matches!(denied[0], CreateOrderError::NoSeatsLeft(_)));
}

/// Order repository that always fails on insert, for forcing the
/// compensation path deterministically.
struct BrokenOrders;

#[async_trait]
impl OrderRepository for BrokenOrders {
    async fn insert_order(&self, _order: &Order) -> Result<(), StoreError> {
        Err("disk full".into())
    }

    async fn update_order_status(
        &self,
        _order_number: &str,
        _status: OrderStatus,
    ) -> Result<(), StoreError> {
        Err("disk full".into())
    }

    async fn find_by_order_number(
        &self,
        _order_number: &str,
    ) -> Result<Option<Order>, StoreError> {
        Ok(None)
    }

    async fn list_by_user(&self, _user_id: i64) -> Result<Vec<Order>, StoreError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn persist_failure_returns_the_seat_to_the_pool() {
    let store = Arc::new(MemorySeatStore::new());
    store.add_seat(Seat::new("CA1234", "12A", SeatClass::Economy, 52000));
    let base = spawn_inventory(Arc::clone(&store)).await;

    let orch = OrderOrchestrator::new(
        Arc::new(inventory_client(&base)),
        Arc::new(BrokenOrders),
        Arc::new(LogReconciler),
    );

    let err = orch.create_order(ALICE, "CA1234", 52000).await.unwrap_err();
    assert!(matches!(err, CreateOrderError::OrderPersistFailed));

    // Compensation released the seat: a fresh claim gets it again.
    let http = reqwest::Client::new();
    let response: AllocateSeatResponse = http
        .post(format!("{base}/api/seats/allocate/CA1234"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.seat.unwrap().seat_number, "12A");
}

#[tokio::test]
async fn unreachable_inventory_leaves_no_order_behind() {
    // Bind and drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let orders = Arc::new(MemoryOrderRepository::new());
    let orch = orchestrator(&format!("http://{addr}"), Arc::clone(&orders));

    let err = orch.create_order(ALICE, "CA1234", 52000).await.unwrap_err();
    assert!(matches!(err, CreateOrderError::AllocationUnreachable));
    assert!(orders.list_by_user(ALICE.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn inventory_timeout_is_unreachable_not_sold_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept and hold the connection open without answering.
        if let Ok((socket, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        }
    });

    let client =
        HttpInventoryClient::new(format!("http://{addr}"), Duration::from_millis(200)).unwrap();
    let orders = Arc::new(MemoryOrderRepository::new());
    let orch = OrderOrchestrator::new(
        Arc::new(client),
        Arc::clone(&orders) as Arc<dyn OrderRepository>,
        Arc::new(LogReconciler),
    );

    let err = orch.create_order(ALICE, "CA1234", 52000).await.unwrap_err();
    assert!(matches!(err, CreateOrderError::AllocationUnreachable));
    assert!(orders.list_by_user(ALICE.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn release_endpoint_is_idempotent_over_the_wire() {
    let store = Arc::new(MemorySeatStore::new());
    store.add_seat(Seat::new("CA1234", "12A", SeatClass::Economy, 52000));
    let base = spawn_inventory(store).await;

    let http = reqwest::Client::new();

    let allocated: AllocateSeatResponse = http
        .post(format!("{base}/api/seats/allocate/CA1234"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(allocated.success);

    let release_body = serde_json::json!({
        "flight_number": "CA1234",
        "seat_number": "12A",
    });

    let first: serde_json::Value = http
        .post(format!("{base}/api/seats/release"))
        .json(&release_body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["status"], "RELEASED");

    let second: serde_json::Value = http
        .post(format!("{base}/api/seats/release"))
        .json(&release_body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["status"], "ALREADY_AVAILABLE");

    let unknown = http
        .post(format!("{base}/api/seats/release"))
        .json(&serde_json::json!({
            "flight_number": "CA1234",
            "seat_number": "99Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exhausted_flight_reports_sold_out_over_the_wire() {
    let store = Arc::new(MemorySeatStore::new());
    store.add_seat(Seat::new("CA1234", "12A", SeatClass::Economy, 52000));
    let base = spawn_inventory(store).await;

    let http = reqwest::Client::new();
    let first: AllocateSeatResponse = http
        .post(format!("{base}/api/seats/allocate/CA1234"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(first.success);

    let second = http
        .post(format!("{base}/api/seats/allocate/CA1234"))
        .send()
        .await
        .unwrap();
    // Sold out is a final business answer on a 200, not a transport error.
    assert_eq!(second.status(), reqwest::StatusCode::OK);
    let body: AllocateSeatResponse = second.json().await.unwrap();
    assert!(!body.success);
    assert_eq!(
        body.reason.as_deref(),
        Some(skylane_core::protocol::REASON_NO_SEATS)
    );
}
