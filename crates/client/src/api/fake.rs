//! In-memory [`ShopApi`] double for unit tests.

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use meteor_shop_core::{
    AuthToken, CartId, CustomerId, Email, OrderId, OrderStatus, PaymentId, PaymentStatus,
    ProductId,
};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use super::ShopApi;
use super::types::{CartLine, LoginResponse, Order, OrderDraft, Payment};
use crate::error::ApiError;

/// Which calls should fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct Failures {
    pub login: bool,
    pub fetch_cart: bool,
    pub remove_line: bool,
    pub clear_cart: bool,
    pub create_order: bool,
    pub fetch_orders: bool,
    pub fetch_payment: bool,
}

/// Calls observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login,
    FetchCart,
    RemoveLine(CartId),
    ClearCart,
    CreateOrder(OrderDraft, Uuid),
    FetchOrders(CustomerId),
    FetchPayment(OrderId),
}

#[derive(Debug, Default)]
pub struct FakeShop {
    pub cart: Mutex<Vec<CartLine>>,
    pub orders: Vec<Order>,
    pub payments: Vec<Payment>,
    pub next_order_id: i32,
    pub login_customer: Option<CustomerId>,
    pub fail: Failures,
    calls: Mutex<Vec<Call>>,
}

impl FakeShop {
    pub fn with_cart(lines: Vec<CartLine>) -> Self {
        Self {
            cart: Mutex::new(lines),
            next_order_id: 101,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

fn refused(what: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        body: format!("{what} failed"),
    }
}

pub fn line(cart_id: i32, price: &str, quantity: u32) -> CartLine {
    CartLine {
        cart_id: CartId::new(cart_id),
        product_id: ProductId::new(cart_id * 10),
        product_name: format!("Product {cart_id}"),
        unit_price: price.parse().expect("valid decimal"),
        customer_id: CustomerId::new(4),
        quantity,
    }
}

pub fn order(id: i32) -> Order {
    Order {
        order_id: OrderId::new(id),
        customer_id: CustomerId::new(4),
        order_date: Utc
            .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
            .single()
            .expect("valid date"),
        total_price: Decimal::from(250),
        status: OrderStatus::Pending,
    }
}

pub fn payment(order_id: i32) -> Payment {
    Payment {
        payment_id: PaymentId::new(order_id + 1000),
        order_id: OrderId::new(order_id),
        payment_method: "PromptPay".to_string(),
        amount: Decimal::from(250),
        payment_date: Utc
            .with_ymd_and_hms(2025, 3, 2, 9, 30, 0)
            .single()
            .expect("valid date"),
        status: PaymentStatus::Completed,
    }
}

impl ShopApi for FakeShop {
    async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        self.record(Call::Login);
        if self.fail.login {
            return Err(refused("login"));
        }
        if password.expose_secret() != "hunter2" {
            return Err(ApiError::Rejected("Invalid email or password".to_string()));
        }
        Ok(LoginResponse {
            token: AuthToken::new(format!("token-for-{email}")),
            customer_id: self.login_customer,
        })
    }

    async fn fetch_cart(&self, _token: &AuthToken) -> Result<Vec<CartLine>, ApiError> {
        self.record(Call::FetchCart);
        if self.fail.fetch_cart {
            return Err(refused("fetch cart"));
        }
        Ok(self.cart.lock().expect("cart lock").clone())
    }

    async fn remove_cart_line(&self, _token: &AuthToken, cart_id: CartId) -> Result<(), ApiError> {
        self.record(Call::RemoveLine(cart_id));
        if self.fail.remove_line {
            return Err(refused("remove line"));
        }
        self.cart
            .lock()
            .expect("cart lock")
            .retain(|l| l.cart_id != cart_id);
        Ok(())
    }

    async fn clear_cart(&self, _token: &AuthToken) -> Result<(), ApiError> {
        self.record(Call::ClearCart);
        if self.fail.clear_cart {
            return Err(refused("clear cart"));
        }
        self.cart.lock().expect("cart lock").clear();
        Ok(())
    }

    async fn create_order(
        &self,
        _token: &AuthToken,
        draft: &OrderDraft,
        idempotency_key: Uuid,
    ) -> Result<OrderId, ApiError> {
        self.record(Call::CreateOrder(draft.clone(), idempotency_key));
        if self.fail.create_order {
            return Err(refused("create order"));
        }
        Ok(OrderId::new(self.next_order_id))
    }

    async fn fetch_orders(
        &self,
        _token: &AuthToken,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, ApiError> {
        self.record(Call::FetchOrders(customer_id));
        if self.fail.fetch_orders {
            return Err(refused("fetch orders"));
        }
        Ok(self.orders.clone())
    }

    async fn fetch_payment(
        &self,
        _token: &AuthToken,
        order_id: OrderId,
    ) -> Result<Option<Payment>, ApiError> {
        self.record(Call::FetchPayment(order_id));
        if self.fail.fetch_payment {
            return Err(refused("fetch payment"));
        }
        Ok(self.payments.iter().find(|p| p.order_id == order_id).cloned())
    }
}
