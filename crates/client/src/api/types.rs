//! Wire types for the shop API.
//!
//! Field names follow the API's `PascalCase`-with-`ID` convention. Decimal
//! amounts are accepted as JSON strings or numbers.

use chrono::{DateTime, Utc};
use meteor_shop_core::{
    AuthToken, CartId, CustomerId, OrderId, OrderStatus, PaymentId, PaymentStatus, ProductId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status marker value the API uses for a successful mutation.
pub const STATUS_SUCCESS: &str = "success";

// =============================================================================
// Cart
// =============================================================================

/// One row in the shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CartLine {
    #[serde(rename = "CartID")]
    pub cart_id: CartId,
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    pub product_name: String,
    /// Unit price, authoritative at the time the line was added.
    #[serde(rename = "Price")]
    pub unit_price: Decimal,
    #[serde(rename = "CustomerID")]
    pub customer_id: CustomerId,
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price × quantity`, or `None` if it overflows a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// `GET /cart` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartResponse {
    #[serde(default)]
    pub cart: Vec<CartLine>,
}

// =============================================================================
// Orders
// =============================================================================

/// Payload submitted to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(rename = "CustomerID")]
    pub customer_id: CustomerId,
    /// Sent as a JSON number carrying the exact decimal digits.
    #[serde(rename = "TotalPrice", with = "rust_decimal::serde::arbitrary_precision")]
    pub total_price: Decimal,
    #[serde(rename = "Status")]
    pub status: OrderStatus,
}

/// `POST /orders` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "OrderID", default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A placed order as listed on the payment history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    #[serde(rename = "OrderID")]
    pub order_id: OrderId,
    #[serde(rename = "CustomerID")]
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: OrderStatus,
}

/// `GET /orders/{customerId}` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
}

// =============================================================================
// Payments
// =============================================================================

/// Payment recorded against an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    #[serde(rename = "PaymentID")]
    pub payment_id: PaymentId,
    #[serde(rename = "OrderID")]
    pub order_id: OrderId,
    pub payment_method: String,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
}

// =============================================================================
// Login
// =============================================================================

/// `POST /login` body.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /login` success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: AuthToken,
    /// Not every deployment returns this; see `--customer-id` on login.
    #[serde(rename = "CustomerID", default)]
    pub customer_id: Option<CustomerId>,
}

// =============================================================================
// Envelopes
// =============================================================================

/// `{ "status": "success" }` style acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    /// Whether the status marker says the mutation happened.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
