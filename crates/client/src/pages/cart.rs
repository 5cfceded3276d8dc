//! Shopping cart page.

use meteor_shop_core::{CartId, CurrencyCode, OrderId, Price};
use tracing::{instrument, warn};

use super::PageState;
use crate::api::{CartLine, ShopApi};
use crate::checkout::{self, CheckoutError, cart_total};
use crate::routes::Route;
use crate::session::Session;

const MSG_EMPTY: &str = "No items in cart.";
const MSG_FETCH_FAILED: &str = "Failed to fetch cart items.";
const MSG_REMOVE_FAILED: &str = "Failed to remove item.";
const MSG_REMOVE_ALL_FAILED: &str = "Failed to remove all items.";

/// Result of a fully successful checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    /// Total that was submitted with the order.
    pub total: Price,
    /// Where to send the user next.
    pub redirect: Route,
}

/// Cart lines as last fetched from the server.
#[derive(Debug, Clone)]
pub struct CartPage {
    lines: Vec<CartLine>,
    state: PageState,
    currency: CurrencyCode,
}

impl CartPage {
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self {
            lines: Vec::new(),
            state: PageState::Loading,
            currency,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Total of the lines currently held. Recomputed on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        // `load` refuses carts whose total overflows, and lines are only removed after that
        Price::new(cart_total(&self.lines).unwrap_or_default(), self.currency)
    }

    /// Fetch the cart.
    #[instrument(skip_all)]
    pub async fn load<A: ShopApi>(&mut self, api: &A, session: &Session) {
        match api.fetch_cart(&session.token).await {
            Ok(lines) if cart_total(&lines).is_none() => {
                warn!(lines = lines.len(), "Cart total overflows");
                self.lines.clear();
                self.state = PageState::Failed(MSG_FETCH_FAILED.to_string());
            }
            Ok(lines) => self.replace(lines),
            Err(e) => {
                warn!(error = %e, "Fetch cart failed");
                self.state = PageState::Failed(MSG_FETCH_FAILED.to_string());
            }
        }
    }

    /// Remove one line. Returns whether the server removed it.
    #[instrument(skip(self, api, session), fields(cart_id = %cart_id))]
    pub async fn remove_line<A: ShopApi>(
        &mut self,
        api: &A,
        session: &Session,
        cart_id: CartId,
    ) -> bool {
        match api.remove_cart_line(&session.token, cart_id).await {
            Ok(()) => {
                let remaining = self
                    .lines
                    .iter()
                    .filter(|l| l.cart_id != cart_id)
                    .cloned()
                    .collect();
                self.replace(remaining);
                true
            }
            Err(e) => {
                warn!(error = %e, "Remove cart line failed");
                self.state = PageState::Failed(MSG_REMOVE_FAILED.to_string());
                false
            }
        }
    }

    /// Remove every line. Returns whether the server cleared the cart.
    #[instrument(skip_all)]
    pub async fn remove_all<A: ShopApi>(&mut self, api: &A, session: &Session) -> bool {
        match api.clear_cart(&session.token).await {
            Ok(()) => {
                self.replace(Vec::new());
                true
            }
            Err(e) => {
                warn!(error = %e, "Clear cart failed");
                self.state = PageState::Failed(MSG_REMOVE_ALL_FAILED.to_string());
                false
            }
        }
    }

    /// Check out the lines currently held.
    ///
    /// On success the page is emptied. On [`CheckoutError::CartClearFailed`]
    /// the lines are kept because the server still has them.
    ///
    /// # Errors
    ///
    /// Returns the [`CheckoutError`] of the failing step; the page state
    /// carries its user message.
    pub async fn checkout<A: ShopApi>(
        &mut self,
        api: &A,
        session: &Session,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let total = self.total();

        match checkout::checkout(api, &self.lines, session).await {
            Ok(order_id) => {
                self.replace(Vec::new());
                Ok(CheckoutReceipt {
                    order_id,
                    total,
                    redirect: Route::OrderDetail(order_id),
                })
            }
            Err(err) => {
                self.state = PageState::Failed(err.user_message());
                Err(err)
            }
        }
    }

    fn replace(&mut self, lines: Vec<CartLine>) {
        self.state = if lines.is_empty() {
            PageState::Empty(MSG_EMPTY.to_string())
        } else {
            PageState::Ready
        };
        self.lines = lines;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use meteor_shop_core::{AuthToken, CustomerId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::fake::{Call, FakeShop, line};

    fn session() -> Session {
        Session::new(AuthToken::new("tok"), CustomerId::new(4))
    }

    async fn loaded(api: &FakeShop) -> CartPage {
        let mut page = CartPage::new(CurrencyCode::THB);
        page.load(api, &session()).await;
        page
    }

    #[tokio::test]
    async fn test_load_ready_and_total() {
        let api = FakeShop::with_cart(vec![line(1, "100.00", 2), line(2, "50.00", 1)]);
        let page = loaded(&api).await;

        assert_eq!(page.state(), &PageState::Ready);
        assert_eq!(page.lines().len(), 2);
        assert_eq!(page.total().display(), "250.00 THB");
    }

    #[tokio::test]
    async fn test_load_empty_and_failed() {
        let api = FakeShop::with_cart(vec![]);
        let page = loaded(&api).await;
        assert_eq!(page.state().message(), Some("No items in cart."));

        let mut api = FakeShop::with_cart(vec![line(1, "1.00", 1)]);
        api.fail.fetch_cart = true;
        let page = loaded(&api).await;
        assert_eq!(page.state().message(), Some("Failed to fetch cart items."));
        assert!(page.lines().is_empty());
    }

    #[tokio::test]
    async fn test_load_refuses_overflowing_cart() {
        let api = FakeShop::with_cart(vec![line(1, &Decimal::MAX.to_string(), 3)]);
        let page = loaded(&api).await;

        assert_eq!(page.state().message(), Some("Failed to fetch cart items."));
        assert!(page.lines().is_empty());
        assert_eq!(page.total().amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_remove_line_updates_total() {
        let api = FakeShop::with_cart(vec![line(1, "100.00", 2), line(2, "50.00", 1)]);
        let mut page = loaded(&api).await;

        assert!(page.remove_line(&api, &session(), CartId::new(1)).await);

        assert_eq!(page.lines().len(), 1);
        assert_eq!(page.total().amount, Decimal::from(50));
    }

    #[tokio::test]
    async fn test_remove_line_failure_keeps_lines() {
        let mut api = FakeShop::with_cart(vec![line(1, "100.00", 2)]);
        api.fail.remove_line = true;
        let mut page = loaded(&api).await;

        assert!(!page.remove_line(&api, &session(), CartId::new(1)).await);

        assert_eq!(page.lines().len(), 1);
        assert_eq!(page.state().message(), Some("Failed to remove item."));
    }

    #[tokio::test]
    async fn test_remove_all() {
        let api = FakeShop::with_cart(vec![line(1, "100.00", 2), line(2, "5.00", 1)]);
        let mut page = loaded(&api).await;

        assert!(page.remove_all(&api, &session()).await);
        assert!(page.lines().is_empty());
        assert_eq!(page.total().amount, Decimal::ZERO);

        let mut api = FakeShop::with_cart(vec![line(1, "100.00", 2)]);
        api.fail.clear_cart = true;
        let mut page = loaded(&api).await;
        assert!(!page.remove_all(&api, &session()).await);
        assert_eq!(page.lines().len(), 1);
        assert_eq!(page.state().message(), Some("Failed to remove all items."));
    }

    #[tokio::test]
    async fn test_checkout_success_empties_and_redirects() {
        let api = FakeShop::with_cart(vec![line(1, "100.00", 2), line(2, "50.00", 1)]);
        let mut page = loaded(&api).await;

        let receipt = page.checkout(&api, &session()).await.unwrap();

        assert_eq!(receipt.order_id, OrderId::new(101));
        assert_eq!(receipt.total.amount, Decimal::from(250));
        assert_eq!(receipt.redirect.to_string(), "/orders?id=101");
        assert!(page.lines().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_empty_page_makes_no_requests() {
        let api = FakeShop::with_cart(vec![]);
        let mut page = CartPage::new(CurrencyCode::THB);

        let err = page.checkout(&api, &session()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(api.calls().is_empty());
        assert_eq!(page.state().message(), Some("Your cart is empty!"));
    }

    #[tokio::test]
    async fn test_checkout_clear_failure_keeps_lines() {
        let mut api = FakeShop::with_cart(vec![line(1, "100.00", 2)]);
        api.fail.clear_cart = true;
        let mut page = loaded(&api).await;

        let err = page.checkout(&api, &session()).await.unwrap_err();

        assert_eq!(err.placed_order(), Some(OrderId::new(101)));
        assert_eq!(page.lines().len(), 1);
        assert!(page.state().is_failed());
        assert_eq!(api.count(|c| matches!(c, Call::ClearCart)), 1);
    }
}
