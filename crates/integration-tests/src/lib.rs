//! Integration tests for Meteor Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p meteor-shop-integration-tests
//! ```
//!
//! No external services are needed: [`MockShop::start`] serves an imitation
//! of the shop API on `127.0.0.1:0` and records every request it sees so
//! tests can assert on call order, headers, and bodies.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{TimeZone, Utc};
use meteor_shop_client::api::{CartLine, Order, Payment};
use meteor_shop_core::{CartId, CustomerId, OrderId, OrderStatus, PaymentId, PaymentStatus, ProductId};
use rust_decimal::Decimal;
use serde_json::{Value, json};

/// Token the mock issues and accepts.
pub const TOKEN: &str = "test-token";
/// Password the mock accepts for any email.
pub const PASSWORD: &str = "hunter2";
/// Customer the mock logs everyone in as.
pub const CUSTOMER: CustomerId = CustomerId::new(4);

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub idempotency_key: Option<String>,
    pub body: Option<Value>,
}

/// Mutable state behind the mock API.
#[derive(Debug, Default)]
pub struct MockState {
    pub cart: Vec<CartLine>,
    pub orders: Vec<Order>,
    pub payments: Vec<Payment>,
    pub next_order_id: i32,
    /// `POST /orders` answers 500 with an empty body.
    pub fail_create_order: bool,
    /// `DELETE /cart` answers 200 with `"status": "error"`.
    pub fail_clear_cart: bool,
    /// `POST /login` omits `CustomerID`.
    pub login_without_customer: bool,
    pub requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<MockState>>;

/// A running mock shop API.
pub struct MockShop {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    state: Shared,
}

impl MockShop {
    /// Serve `state` on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener address");

        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Lock the mock state for inspection or tweaking.
    ///
    /// # Panics
    ///
    /// Panics if a handler panicked while holding the lock.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock")
    }

    /// Recorded requests matching a method and path.
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == *method && r.path == path)
            .cloned()
            .collect()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A cart line owned by [`CUSTOMER`].
///
/// # Panics
///
/// Panics if `price` is not a decimal.
pub fn cart_line(cart_id: i32, name: &str, price: &str, quantity: u32) -> CartLine {
    CartLine {
        cart_id: CartId::new(cart_id),
        product_id: ProductId::new(cart_id + 500),
        product_name: name.to_string(),
        unit_price: price.parse().expect("decimal price"),
        customer_id: CUSTOMER,
        quantity,
    }
}

/// A completed payment for an order.
///
/// # Panics
///
/// Panics if `amount` is not a decimal.
pub fn payment_for(order_id: i32, amount: &str) -> Payment {
    Payment {
        payment_id: PaymentId::new(order_id + 9000),
        order_id: OrderId::new(order_id),
        payment_method: "Credit Card".to_string(),
        amount: amount.parse().expect("decimal amount"),
        payment_date: Utc
            .with_ymd_and_hms(2025, 3, 2, 9, 30, 0)
            .single()
            .expect("valid date"),
        status: PaymentStatus::Completed,
    }
}

// =============================================================================
// Router
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/{cart_id}", delete(remove_line))
        .route("/api/orders", post(create_order))
        .route("/api/orders/{customer_id}", get(list_orders))
        .route("/api/payments/{order_id}", get(get_payment))
        .with_state(state)
}

fn record(state: &mut MockState, method: Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        authorization: header("authorization"),
        idempotency_key: header("idempotency-key"),
        body: serde_json::from_slice(body).ok(),
    });
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().expect("mock state lock")
}

async fn login(State(state): State<Shared>, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let mut s = lock(&state);
    record(&mut s, Method::POST, &uri, &headers, &body);

    let password = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("password").and_then(Value::as_str).map(str::to_string));

    if password.as_deref() != Some(PASSWORD) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password"})),
        )
            .into_response();
    }

    if s.login_without_customer {
        Json(json!({"token": TOKEN})).into_response()
    } else {
        Json(json!({"token": TOKEN, "CustomerID": CUSTOMER})).into_response()
    }
}

async fn get_cart(State(state): State<Shared>, uri: Uri, headers: HeaderMap) -> Response {
    let mut s = lock(&state);
    record(&mut s, Method::GET, &uri, &headers, &Bytes::new());

    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"cart": s.cart})).into_response()
}

async fn clear_cart(State(state): State<Shared>, uri: Uri, headers: HeaderMap) -> Response {
    let mut s = lock(&state);
    record(&mut s, Method::DELETE, &uri, &headers, &Bytes::new());

    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if s.fail_clear_cart {
        return Json(json!({"status": "error", "message": "Database busy"})).into_response();
    }
    s.cart.clear();
    Json(json!({"status": "success"})).into_response()
}

async fn remove_line(
    State(state): State<Shared>,
    Path(cart_id): Path<i32>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let mut s = lock(&state);
    record(&mut s, Method::DELETE, &uri, &headers, &Bytes::new());

    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let before = s.cart.len();
    s.cart.retain(|l| l.cart_id != CartId::new(cart_id));
    if s.cart.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Cart item not found"})),
        )
            .into_response();
    }
    Json(json!({"status": "success"})).into_response()
}

async fn create_order(
    State(state): State<Shared>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut s = lock(&state);
    record(&mut s, Method::POST, &uri, &headers, &body);

    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if s.fail_create_order {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let Ok(draft) = serde_json::from_slice::<Value>(&body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let customer_id = draft
        .get("CustomerID")
        .and_then(Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
        .map_or(CUSTOMER, CustomerId::new);
    let total_price = draft
        .get("TotalPrice")
        .filter(|t| t.is_number())
        .and_then(|t| t.to_string().parse::<Decimal>().ok())
        .unwrap_or_default();

    let order_id = OrderId::new(s.next_order_id);
    s.next_order_id += 1;
    s.orders.push(Order {
        order_id,
        customer_id,
        order_date: Utc
            .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
            .single()
            .expect("valid date"),
        total_price,
        status: OrderStatus::Pending,
    });

    Json(json!({"status": "success", "OrderID": order_id})).into_response()
}

async fn list_orders(
    State(state): State<Shared>,
    Path(customer_id): Path<i32>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let mut s = lock(&state);
    record(&mut s, Method::GET, &uri, &headers, &Bytes::new());

    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let orders: Vec<&Order> = s
        .orders
        .iter()
        .filter(|o| o.customer_id == CustomerId::new(customer_id))
        .collect();
    Json(json!({"orders": orders})).into_response()
}

async fn get_payment(
    State(state): State<Shared>,
    Path(order_id): Path<i32>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let mut s = lock(&state);
    record(&mut s, Method::GET, &uri, &headers, &Bytes::new());

    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match s
        .payments
        .iter()
        .find(|p| p.order_id == OrderId::new(order_id))
    {
        Some(payment) => Json(json!(payment)).into_response(),
        None => Json(json!({"message": "No payment for this order"})).into_response(),
    }
}
