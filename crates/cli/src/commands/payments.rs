//! Payment history commands.

use askama::Template;
use meteor_shop_client::pages::{PageState, PaymentHistoryPage};
use meteor_shop_core::OrderId;

use super::{CommandError, Context, emit};
use crate::render::{OrdersTemplate, PaymentTemplate};

fn failure(state: &PageState) -> Option<CommandError> {
    state
        .is_failed()
        .then(|| CommandError::Page(state.message().unwrap_or_default().to_string()))
}

/// List the customer's orders.
pub async fn orders(ctx: &Context) -> Result<(), CommandError> {
    let session = ctx.session()?;
    let mut page = PaymentHistoryPage::new();
    page.load(&ctx.api, &session).await;

    if let Some(err) = failure(page.state()) {
        return Err(err);
    }
    emit(&OrdersTemplate::new(&page, ctx.config.currency).render()?)
}

/// Show the payment recorded for one order.
pub async fn payment(ctx: &Context, order_id: OrderId) -> Result<(), CommandError> {
    let session = ctx.session()?;
    let mut page = PaymentHistoryPage::new();

    page.select(&ctx.api, &session, order_id).await;

    let Some(payment) = page.payment() else {
        return Err(failure(page.state())
            .unwrap_or_else(|| CommandError::Page("No payment found for this order.".into())));
    };

    emit(&PaymentTemplate::new(payment, ctx.config.currency).render()?)
}
