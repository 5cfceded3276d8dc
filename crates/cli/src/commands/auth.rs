//! Login and logout.

use meteor_shop_client::pages::LoginPage;
use meteor_shop_core::CustomerId;
use secrecy::SecretString;

use super::{CommandError, Context, emit};

/// Log in and store the session.
pub async fn login(
    ctx: &Context,
    email: &str,
    password: String,
    customer_id: Option<CustomerId>,
) -> Result<(), CommandError> {
    let password = SecretString::from(password);
    let mut page = LoginPage::new();

    let Some(outcome) = page.submit(&ctx.api, email, &password, customer_id).await else {
        return Err(CommandError::Page(
            page.state()
                .message()
                .unwrap_or("Login failed. Try again.")
                .to_string(),
        ));
    };

    ctx.store.save(&outcome.session)?;
    tracing::info!(
        path = %ctx.store.path().display(),
        redirect = %outcome.redirect,
        "Session stored"
    );

    emit(&format!(
        "Logged in as customer {}.",
        outcome.session.customer_id
    ))
}

/// Remove the stored session.
pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    ctx.store.clear()?;
    emit("Logged out.")
}
