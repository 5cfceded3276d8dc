//! Cart commands: show, remove, clear, checkout.

use askama::Template;
use meteor_shop_client::pages::CartPage;
use meteor_shop_client::{CheckoutError, Session};
use meteor_shop_core::CartId;

use super::{CommandError, Context, confirm, emit};
use crate::render::{CartTemplate, ReceiptTemplate};

async fn load(ctx: &Context, session: &Session) -> Result<CartPage, CommandError> {
    let mut page = CartPage::new(ctx.config.currency);
    page.load(&ctx.api, session).await;

    if page.state().is_failed() {
        return Err(page_error(&page));
    }
    Ok(page)
}

fn page_error(page: &CartPage) -> CommandError {
    CommandError::Page(page.state().message().unwrap_or_default().to_string())
}

/// Print the cart and its total.
pub async fn show(ctx: &Context) -> Result<(), CommandError> {
    let session = ctx.session()?;
    let page = load(ctx, &session).await?;
    emit(&CartTemplate::from(&page).render()?)
}

/// Remove one cart line.
pub async fn remove(ctx: &Context, cart_id: CartId, yes: bool) -> Result<(), CommandError> {
    let session = ctx.session()?;
    let mut page = load(ctx, &session).await?;

    if !page.lines().iter().any(|l| l.cart_id == cart_id) {
        return Err(CommandError::Page(format!("No cart line #{cart_id}.")));
    }
    if !yes && !confirm("Are you sure you want to remove this item?")? {
        return Ok(());
    }

    if !page.remove_line(&ctx.api, &session, cart_id).await {
        return Err(page_error(&page));
    }

    emit("Item removed from cart!")?;
    emit(&CartTemplate::from(&page).render()?)
}

/// Remove every cart line.
pub async fn clear(ctx: &Context, yes: bool) -> Result<(), CommandError> {
    let session = ctx.session()?;
    let mut page = CartPage::new(ctx.config.currency);

    if !yes && !confirm("Are you sure you want to remove all items from the cart?")? {
        return Ok(());
    }

    if !page.remove_all(&ctx.api, &session).await {
        return Err(page_error(&page));
    }

    emit("All items removed from cart!")
}

/// Check out the current cart.
pub async fn checkout(ctx: &Context) -> Result<(), CommandError> {
    let session = ctx.session()?;
    let mut page = load(ctx, &session).await?;

    match page.checkout(&ctx.api, &session).await {
        Ok(receipt) => emit(&ReceiptTemplate::from(&receipt).render()?),
        Err(err @ CheckoutError::CartClearFailed { .. }) => {
            // The order exists; show what is still in the cart before failing
            emit(&CartTemplate::from(&page).render()?)?;
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
