//! Shop API access.
//!
//! # Architecture
//!
//! - [`ShopApi`] is the seam every page model and the checkout sequence are
//!   written against
//! - [`ShopClient`] implements it over HTTP with `reqwest`
//! - Every call except login takes the bearer token explicitly
//!
//! # Endpoints
//!
//! | call | method | path |
//! |---|---|---|
//! | `login` | POST | `/login` |
//! | `fetch_cart` | GET | `/cart` |
//! | `remove_cart_line` | DELETE | `/cart/{cartId}` |
//! | `clear_cart` | DELETE | `/cart` |
//! | `create_order` | POST | `/orders` |
//! | `fetch_orders` | GET | `/orders/{customerId}` |
//! | `fetch_payment` | GET | `/payments/{orderId}` |

use std::future::Future;

use meteor_shop_core::{AuthToken, CartId, CustomerId, Email, OrderId};
use secrecy::SecretString;
use uuid::Uuid;

use crate::error::ApiError;

mod client;
#[cfg(test)]
pub(crate) mod fake;
pub mod types;

pub use client::ShopClient;
pub use types::*;

/// Operations the shop API offers to a logged-in customer.
pub trait ShopApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// All lines currently in the caller's cart.
    fn fetch_cart(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<Vec<CartLine>, ApiError>> + Send;

    /// Remove a single cart line.
    fn remove_cart_line(
        &self,
        token: &AuthToken,
        cart_id: CartId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Remove every line in the caller's cart. Idempotent.
    fn clear_cart(&self, token: &AuthToken) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Create an order and return its server-issued id.
    ///
    /// `idempotency_key` is sent as the `Idempotency-Key` header.
    fn create_order(
        &self,
        token: &AuthToken,
        draft: &OrderDraft,
        idempotency_key: Uuid,
    ) -> impl Future<Output = Result<OrderId, ApiError>> + Send;

    /// Orders placed by a customer.
    fn fetch_orders(
        &self,
        token: &AuthToken,
        customer_id: CustomerId,
    ) -> impl Future<Output = Result<Vec<Order>, ApiError>> + Send;

    /// Payment recorded for an order, or `None` if there is none yet.
    fn fetch_payment(
        &self,
        token: &AuthToken,
        order_id: OrderId,
    ) -> impl Future<Output = Result<Option<Payment>, ApiError>> + Send;
}
