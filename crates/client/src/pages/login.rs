//! Login page.

use meteor_shop_core::{CustomerId, Email};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use super::PageState;
use crate::api::ShopApi;
use crate::error::ApiError;
use crate::routes::Route;
use crate::session::Session;

const MSG_LOGIN_FAILED: &str = "Login failed. Try again.";
const MSG_NO_CUSTOMER: &str =
    "Login succeeded but the shop did not say which customer you are; pass a customer id.";

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: Session,
    pub redirect: Route,
}

#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    state: PageState,
}

impl LoginPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    /// Submit the login form.
    ///
    /// `customer_id` is used when the login response does not carry one; a
    /// customer id in the response wins.
    #[instrument(skip(self, api, password))]
    pub async fn submit<A: ShopApi>(
        &mut self,
        api: &A,
        email: &str,
        password: &SecretString,
        customer_id: Option<CustomerId>,
    ) -> Option<LoginOutcome> {
        let email = match Email::parse(email) {
            Ok(email) => email,
            Err(e) => {
                self.state = PageState::Failed(format!("Invalid email: {e}"));
                return None;
            }
        };

        let response = match api.login(&email, password).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.state = PageState::Failed(match e {
                    ApiError::Rejected(message) => message,
                    _ => MSG_LOGIN_FAILED.to_string(),
                });
                return None;
            }
        };

        let Some(customer_id) = response.customer_id.or(customer_id) else {
            self.state = PageState::Failed(MSG_NO_CUSTOMER.to_string());
            return None;
        };

        info!(customer_id = %customer_id, "Logged in");
        self.state = PageState::Ready;
        Some(LoginOutcome {
            session: Session::new(response.token, customer_id),
            redirect: Route::Home,
        })
    }
}
