//! Cart-to-order checkout.
//!
//! Checkout is two sequential mutations against the shop API:
//!
//! 1. create an order for the cart total
//! 2. clear the cart
//!
//! The cart clear is only issued once order creation has returned an id.
//! Nothing is rolled back if step 2 fails; that outcome is reported as
//! [`CheckoutError::CartClearFailed`] and still carries the new order id.
//!
//! Re-running checkout after a reported success creates a second order.
//! Each attempt sends a fresh idempotency key so servers that honour it can
//! deduplicate retries of the same attempt.

use meteor_shop_core::{OrderId, OrderStatus};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use crate::api::{CartLine, OrderDraft, ShopApi};
use crate::error::ApiError;
use crate::session::Session;

/// Why a checkout attempt stopped.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to check out. No request was made.
    #[error("cart is empty")]
    EmptyCart,

    /// The order was not created. The cart is untouched.
    #[error("failed to create order: {0}")]
    OrderCreationFailed(#[source] ApiError),

    /// The order exists but the cart still holds its lines.
    #[error("order {order_id} was placed but the cart could not be cleared: {source}")]
    CartClearFailed {
        order_id: OrderId,
        #[source]
        source: ApiError,
    },
}

impl CheckoutError {
    /// True when the failing step never reached the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        match self {
            Self::EmptyCart => false,
            Self::OrderCreationFailed(source) | Self::CartClearFailed { source, .. } => {
                source.is_transport()
            }
        }
    }

    /// The order that was placed despite the failure, if any.
    #[must_use]
    pub const fn placed_order(&self) -> Option<OrderId> {
        match self {
            Self::CartClearFailed { order_id, .. } => Some(*order_id),
            _ => None,
        }
    }

    /// Message for the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty!".to_string(),
            Self::CartClearFailed { order_id, .. } => {
                format!("Order {order_id} was placed, but the cart could not be cleared.")
            }
            err if err.is_transport() => "Error during checkout.".to_string(),
            Self::OrderCreationFailed(_) => "Failed to create order.".to_string(),
        }
    }
}

/// Message carried when a cart total cannot be represented.
pub const TOTAL_OUT_OF_RANGE: &str = "cart total is out of range";

/// Σ `unit_price × quantity` over the lines, or `None` on overflow.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.line_total()?))
}

/// Build the order payload for the session's customer.
///
/// `None` when the total overflows.
#[must_use]
pub fn order_draft(lines: &[CartLine], session: &Session) -> Option<OrderDraft> {
    Some(OrderDraft {
        customer_id: session.customer_id,
        total_price: cart_total(lines)?,
        status: OrderStatus::Pending,
    })
}

/// Turn the cart into an order, then clear the cart.
///
/// Returns the server-issued order id on full success.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`] when `lines` is empty
/// - [`CheckoutError::OrderCreationFailed`] when the order was not created
/// - [`CheckoutError::CartClearFailed`] when the order exists but the cart
///   could not be cleared
#[instrument(skip_all, fields(lines = lines.len(), customer_id = %session.customer_id))]
pub async fn checkout<A: ShopApi>(
    api: &A,
    lines: &[CartLine],
    session: &Session,
) -> Result<OrderId, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let foreign = lines
        .iter()
        .filter(|l| l.customer_id != session.customer_id)
        .count();
    if foreign > 0 {
        warn!(
            foreign,
            "Cart lines belong to another customer; ordering for the session customer"
        );
    }

    let Some(draft) = order_draft(lines, session) else {
        warn!("Cart total overflows; not submitting");
        return Err(CheckoutError::OrderCreationFailed(ApiError::Rejected(
            TOTAL_OUT_OF_RANGE.to_string(),
        )));
    };
    let idempotency_key = Uuid::new_v4();

    let order_id = api
        .create_order(&session.token, &draft, idempotency_key)
        .await
        .map_err(|source| {
            warn!(error = %source, "Order creation failed");
            CheckoutError::OrderCreationFailed(source)
        })?;

    debug!(order_id = %order_id, total = %draft.total_price, "Order created");

    api.clear_cart(&session.token).await.map_err(|source| {
        error!(
            order_id = %order_id,
            error = %source,
            "Order placed but cart clear failed"
        );
        CheckoutError::CartClearFailed { order_id, source }
    })?;

    debug!(order_id = %order_id, "Checkout complete");
    Ok(order_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use meteor_shop_core::{AuthToken, CustomerId};

    use super::*;
    use crate::api::fake::{Call, FakeShop, line};

    fn session() -> Session {
        Session::new(AuthToken::new("tok"), CustomerId::new(4))
    }

    fn is_create(call: &Call) -> bool {
        matches!(call, Call::CreateOrder(..))
    }

    fn is_clear(call: &Call) -> bool {
        matches!(call, Call::ClearCart)
    }

    #[test]
    fn test_cart_total_is_exact() {
        let lines = vec![line(1, "100.00", 2), line(2, "50.00", 1)];
        assert_eq!(cart_total(&lines), Some("250.00".parse().unwrap()));

        // 0.1 + 0.2 style sums must not drift
        let many: Vec<_> = (0..1000).map(|i| line(i, "0.10", 3)).collect();
        assert_eq!(cart_total(&many), Some("300.00".parse().unwrap()));
    }

    #[test]
    fn test_cart_total_is_order_independent() {
        let mut lines = vec![
            line(1, "19.99", 3),
            line(2, "0.01", 7),
            line(3, "1234.56", 1),
        ];
        let forward = cart_total(&lines);
        lines.reverse();
        assert_eq!(cart_total(&lines), forward);
        lines.swap(0, 1);
        assert_eq!(cart_total(&lines), forward);
        assert_eq!(forward, Some("1294.60".parse().unwrap()));
    }

    #[test]
    fn test_cart_total_empty_is_zero() {
        assert_eq!(cart_total(&[]), Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_overflowing_total_is_never_submitted() {
        let max = Decimal::MAX.to_string();
        let lines = vec![line(1, &max, 2)];
        assert_eq!(cart_total(&lines), None);
        assert_eq!(cart_total(&[line(1, &max, 1), line(2, &max, 1)]), None);

        let api = FakeShop::with_cart(lines.clone());
        let err = checkout(&api, &lines, &session()).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::OrderCreationFailed(ApiError::Rejected(ref m)) if m == TOTAL_OUT_OF_RANGE
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_requests() {
        let api = FakeShop::with_cart(vec![]);

        let err = checkout(&api, &[], &session()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_full_success_submits_total_then_clears() {
        let lines = vec![line(1, "100.00", 2), line(2, "50.00", 1)];
        let api = FakeShop::with_cart(lines.clone());

        let order_id = checkout(&api, &lines, &session()).await.unwrap();

        assert_eq!(order_id, OrderId::new(101));
        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        match calls.first() {
            Some(Call::CreateOrder(draft, _)) => {
                assert_eq!(draft.total_price, "250.00".parse::<Decimal>().unwrap());
                assert_eq!(draft.customer_id, CustomerId::new(4));
                assert_eq!(draft.status, OrderStatus::Pending);
            }
            other => panic!("expected order creation first, got {other:?}"),
        }
        assert_eq!(calls.get(1), Some(&Call::ClearCart));
        assert!(api.cart.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_creation_failure_never_clears() {
        let lines = vec![line(1, "100.00", 1)];
        let mut api = FakeShop::with_cart(lines.clone());
        api.fail.create_order = true;

        let err = checkout(&api, &lines, &session()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::OrderCreationFailed(_)));
        assert_eq!(err.placed_order(), None);
        assert_eq!(api.count(is_create), 1);
        assert_eq!(api.count(is_clear), 0);
        assert_eq!(api.cart.lock().unwrap().len(), 1);
        assert_eq!(err.user_message(), "Failed to create order.");
    }

    #[tokio::test]
    async fn test_clear_failure_reports_partial_success() {
        let lines = vec![line(1, "100.00", 1)];
        let mut api = FakeShop::with_cart(lines.clone());
        api.fail.clear_cart = true;
        api.next_order_id = 77;

        let err = checkout(&api, &lines, &session()).await.unwrap_err();

        assert!(
            matches!(err, CheckoutError::CartClearFailed { order_id, .. } if order_id == OrderId::new(77))
        );
        assert_eq!(err.placed_order(), Some(OrderId::new(77)));
        assert!(!err.is_transport());
        assert_eq!(
            err.user_message(),
            "Order 77 was placed, but the cart could not be cleared."
        );
    }

    #[tokio::test]
    async fn test_each_attempt_uses_a_fresh_idempotency_key() {
        let lines = vec![line(1, "10.00", 1)];
        let api = FakeShop::with_cart(lines.clone());

        checkout(&api, &lines, &session()).await.unwrap();
        checkout(&api, &lines, &session()).await.unwrap();

        let keys: Vec<Uuid> = api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateOrder(_, key) => Some(key),
                _ => None,
            })
            .collect();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys.first(), keys.get(1));
    }

    #[tokio::test]
    async fn test_orders_for_session_customer() {
        let mut foreign = line(1, "10.00", 1);
        foreign.customer_id = CustomerId::new(99);
        let api = FakeShop::with_cart(vec![foreign.clone()]);

        checkout(&api, &[foreign], &session()).await.unwrap();

        let customer = api.calls().into_iter().find_map(|c| match c {
            Call::CreateOrder(draft, _) => Some(draft.customer_id),
            _ => None,
        });
        assert_eq!(customer, Some(CustomerId::new(4)));
    }
}
