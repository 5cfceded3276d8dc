//! Payment history page: pick one of the customer's orders, see its payment.

use meteor_shop_core::OrderId;
use tracing::{instrument, warn};

use super::PageState;
use crate::api::{Order, Payment, ShopApi};
use crate::session::Session;

const MSG_NO_ORDERS: &str = "No orders found.";
const MSG_ORDERS_FAILED: &str = "Failed to fetch orders.";
const MSG_NO_PAYMENT: &str = "No payment found for this order.";
const MSG_PAYMENT_FAILED: &str = "Failed to fetch payment details.";

#[derive(Debug, Clone, Default)]
pub struct PaymentHistoryPage {
    orders: Vec<Order>,
    selected: Option<OrderId>,
    payment: Option<Payment>,
    state: PageState,
}

impl PaymentHistoryPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub const fn selected(&self) -> Option<OrderId> {
        self.selected
    }

    #[must_use]
    pub const fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    /// Fetch the session customer's orders.
    #[instrument(skip_all, fields(customer_id = %session.customer_id))]
    pub async fn load<A: ShopApi>(&mut self, api: &A, session: &Session) {
        match api.fetch_orders(&session.token, session.customer_id).await {
            Ok(orders) if orders.is_empty() => {
                self.orders = orders;
                self.state = PageState::Empty(MSG_NO_ORDERS.to_string());
            }
            Ok(orders) => {
                self.orders = orders;
                self.state = PageState::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Fetch orders failed");
                self.state = PageState::Failed(MSG_ORDERS_FAILED.to_string());
            }
        }
    }

    /// Select an order and fetch its payment.
    ///
    /// Returns the payment when one is recorded.
    #[instrument(skip(self, api, session), fields(order_id = %order_id))]
    pub async fn select<A: ShopApi>(
        &mut self,
        api: &A,
        session: &Session,
        order_id: OrderId,
    ) -> Option<&Payment> {
        self.selected = Some(order_id);

        match api.fetch_payment(&session.token, order_id).await {
            Ok(Some(payment)) => {
                self.payment = Some(payment);
                self.state = PageState::Ready;
            }
            Ok(None) => {
                self.payment = None;
                self.state = PageState::Failed(MSG_NO_PAYMENT.to_string());
            }
            Err(e) => {
                warn!(error = %e, "Fetch payment failed");
                self.payment = None;
                self.state = PageState::Failed(MSG_PAYMENT_FAILED.to_string());
            }
        }

        self.payment.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use meteor_shop_core::{AuthToken, CustomerId, PaymentStatus};

    use super::*;
    use crate::api::fake::{Call, FakeShop, order, payment};

    fn session() -> Session {
        Session::new(AuthToken::new("tok"), CustomerId::new(4))
    }

    #[tokio::test]
    async fn test_load_uses_session_customer() {
        let mut api = FakeShop::default();
        api.orders = vec![order(1), order(2)];
        let mut page = PaymentHistoryPage::new();

        page.load(&api, &session()).await;

        assert_eq!(page.state(), &PageState::Ready);
        assert_eq!(page.orders().len(), 2);
        assert_eq!(api.calls(), vec![Call::FetchOrders(CustomerId::new(4))]);
    }

    #[tokio::test]
    async fn test_load_empty_and_failed() {
        let mut page = PaymentHistoryPage::new();
        page.load(&FakeShop::default(), &session()).await;
        assert_eq!(page.state().message(), Some("No orders found."));

        let mut api = FakeShop::default();
        api.fail.fetch_orders = true;
        page.load(&api, &session()).await;
        assert_eq!(page.state().message(), Some("Failed to fetch orders."));
    }

    #[tokio::test]
    async fn test_select_shows_payment() {
        let mut api = FakeShop::default();
        api.orders = vec![order(7)];
        api.payments = vec![payment(7)];
        let mut page = PaymentHistoryPage::new();
        page.load(&api, &session()).await;

        let shown = page.select(&api, &session(), OrderId::new(7)).await.cloned();

        assert_eq!(shown.map(|p| p.status), Some(PaymentStatus::Completed));
        assert_eq!(page.selected(), Some(OrderId::new(7)));
    }

    #[tokio::test]
    async fn test_select_without_payment_clears_previous() {
        let mut api = FakeShop::default();
        api.payments = vec![payment(7)];
        let mut page = PaymentHistoryPage::new();
        page.select(&api, &session(), OrderId::new(7)).await;
        assert!(page.payment().is_some());

        let shown = page.select(&api, &session(), OrderId::new(8)).await;

        assert!(shown.is_none());
        assert_eq!(page.state().message(), Some("No payment found for this order."));
    }

    #[tokio::test]
    async fn test_select_failure_message() {
        let mut api = FakeShop::default();
        api.fail.fetch_payment = true;
        let mut page = PaymentHistoryPage::new();

        page.select(&api, &session(), OrderId::new(7)).await;

        assert_eq!(
            page.state().message(),
            Some("Failed to fetch payment details.")
        );
    }

    #[tokio::test]
    async fn test_select_failure_drops_previous_payment() {
        let mut api = FakeShop::default();
        api.payments = vec![payment(7)];
        let mut page = PaymentHistoryPage::new();
        assert!(page.select(&api, &session(), OrderId::new(7)).await.is_some());

        api.fail.fetch_payment = true;
        let shown = page.select(&api, &session(), OrderId::new(8)).await;

        assert!(shown.is_none());
        assert!(page.payment().is_none());
        assert_eq!(page.selected(), Some(OrderId::new(8)));
        assert!(page.state().is_failed());
    }
}
