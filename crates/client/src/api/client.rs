//! HTTP implementation of [`ShopApi`].

use std::sync::Arc;

use meteor_shop_core::{AuthToken, CartId, CustomerId, Email, OrderId};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use super::ShopApi;
use super::types::{
    CartLine, CartResponse, CreateOrderResponse, ErrorBody, LoginRequest, LoginResponse, Order,
    OrderDraft, OrdersResponse, Payment, StatusResponse,
};
use crate::config::{ShopConfig, parse_api_url};
use crate::error::ApiError;

/// Header carrying the per-attempt order creation key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// How much of an error body is kept for logs and error values.
const BODY_EXCERPT_CHARS: usize = 200;

// =============================================================================
// ShopClient
// =============================================================================

/// Client for the shop's JSON API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ShopClient {
    inner: Arc<ShopClientInner>,
}

struct ShopClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ShopClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ShopClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &ShopConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ShopClientInner {
                client: builder.build()?,
                base_url: config.api_url.clone(),
            }),
        })
    }

    /// Create a client for a base URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the URL is not an http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let base_url = parse_api_url(base_url).map_err(ApiError::Rejected)?;
        Ok(Self {
            inner: Arc::new(ShopClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        })
    }

    /// The API base URL (always ends in `/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path)?;
        Ok(self.inner.client.request(method, url))
    }

    fn authed(
        &self,
        method: Method,
        path: &str,
        token: &AuthToken,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.request(method, path)?.bearer_auth(token.expose()))
    }

    /// Send a request and decode a JSON success body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await.map_err(ApiError::Body)?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %excerpt(&body),
                "Shop API returned non-success status"
            );
            return Err(error_for_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse shop API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a mutation and require a `"status": "success"` marker.
    async fn execute_marked(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let marker: StatusResponse = self.execute(request).await?;
        if marker.is_success() {
            Ok(())
        } else {
            Err(rejection(marker.status.as_deref(), marker.message))
        }
    }
}

impl ShopApi for ShopClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let response: LoginResponse = self
            .execute(self.request(Method::POST, "login")?.json(&body))
            .await?;

        debug!(customer_id = ?response.customer_id, "Logged in");
        Ok(response)
    }

    #[instrument(skip(self, token))]
    async fn fetch_cart(&self, token: &AuthToken) -> Result<Vec<CartLine>, ApiError> {
        let response: CartResponse = self
            .execute(self.authed(Method::GET, "cart", token)?)
            .await?;

        debug!(lines = response.cart.len(), "Fetched cart");
        Ok(response.cart)
    }

    #[instrument(skip(self, token), fields(cart_id = %cart_id))]
    async fn remove_cart_line(&self, token: &AuthToken, cart_id: CartId) -> Result<(), ApiError> {
        self.execute_marked(self.authed(Method::DELETE, &format!("cart/{cart_id}"), token)?)
            .await?;

        debug!("Removed cart line");
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn clear_cart(&self, token: &AuthToken) -> Result<(), ApiError> {
        self.execute_marked(self.authed(Method::DELETE, "cart", token)?)
            .await?;

        debug!("Cleared cart");
        Ok(())
    }

    #[instrument(
        skip(self, token, draft),
        fields(customer_id = %draft.customer_id, total = %draft.total_price)
    )]
    async fn create_order(
        &self,
        token: &AuthToken,
        draft: &OrderDraft,
        idempotency_key: Uuid,
    ) -> Result<OrderId, ApiError> {
        let request = self
            .authed(Method::POST, "orders", token)?
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string())
            .json(draft);
        let response: CreateOrderResponse = self.execute(request).await?;

        if response.status.as_deref() != Some(super::types::STATUS_SUCCESS) {
            return Err(rejection(response.status.as_deref(), response.message));
        }

        let order_id = response
            .order_id
            .ok_or_else(|| ApiError::Rejected("order created without an OrderID".to_string()))?;

        debug!(order_id = %order_id, "Created order");
        Ok(order_id)
    }

    #[instrument(skip(self, token), fields(customer_id = %customer_id))]
    async fn fetch_orders(
        &self,
        token: &AuthToken,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, ApiError> {
        let response: OrdersResponse = self
            .execute(self.authed(Method::GET, &format!("orders/{customer_id}"), token)?)
            .await?;

        debug!(orders = response.orders.len(), "Fetched orders");
        Ok(response.orders)
    }

    #[instrument(skip(self, token), fields(order_id = %order_id))]
    async fn fetch_payment(
        &self,
        token: &AuthToken,
        order_id: OrderId,
    ) -> Result<Option<Payment>, ApiError> {
        let value: serde_json::Value = self
            .execute(self.authed(Method::GET, &format!("payments/{order_id}"), token)?)
            .await?;

        // An answer without an OrderID means no payment is recorded yet
        if value.get("OrderID").is_none_or(serde_json::Value::is_null) {
            debug!("No payment recorded");
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(value)?))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

/// Map a non-success response to an error, preferring the server's message.
fn error_for_status(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    match (message, status) {
        (Some(message), _) => ApiError::Rejected(message),
        (None, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => ApiError::Unauthorized,
        (None, status) => ApiError::Status {
            status: status.as_u16(),
            body: excerpt(body),
        },
    }
}

fn rejection(status: Option<&str>, message: Option<String>) -> ApiError {
    ApiError::Rejected(message.unwrap_or_else(|| match status {
        Some(status) => format!("unexpected status marker: {status}"),
        None => "missing status marker".to_string(),
    }))
}
