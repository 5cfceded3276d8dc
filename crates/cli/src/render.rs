//! Text views for terminal output.
//!
//! Every view is an askama template under `templates/`; the structs here
//! hold pre-formatted strings so templates stay free of formatting logic.

use askama::Template;
use chrono::{DateTime, Utc};
use meteor_shop_client::api::Payment;
use meteor_shop_client::pages::{CartPage, CheckoutReceipt, PageState, PaymentHistoryPage};
use meteor_shop_core::{BadgeTone, CurrencyCode, Price};

fn money(amount: rust_decimal::Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).display()
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

// =============================================================================
// Cart
// =============================================================================

pub struct CartRow {
    pub cart_id: String,
    pub product_id: String,
    pub product_name: String,
    pub customer_id: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Template)]
#[template(path = "cart.txt")]
pub struct CartTemplate {
    pub rows: Vec<CartRow>,
    pub notice: Option<String>,
    pub total: String,
}

impl From<&CartPage> for CartTemplate {
    fn from(page: &CartPage) -> Self {
        let currency = page.currency();
        let rows = page
            .lines()
            .iter()
            .map(|line| CartRow {
                cart_id: line.cart_id.to_string(),
                product_id: line.product_id.to_string(),
                product_name: line.product_name.clone(),
                customer_id: line.customer_id.to_string(),
                quantity: line.quantity,
                unit_price: money(line.unit_price, currency),
                line_total: line
                    .line_total()
                    .map_or_else(String::new, |t| money(t, currency)),
            })
            .collect();

        // Empty carts already say so in the template
        let notice = match page.state() {
            PageState::Failed(msg) => Some(msg.clone()),
            _ => None,
        };

        Self {
            rows,
            notice,
            total: page.total().display(),
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

#[derive(Template)]
#[template(path = "receipt.txt")]
pub struct ReceiptTemplate {
    pub order_id: String,
    pub total: String,
    pub redirect: String,
}

impl From<&CheckoutReceipt> for ReceiptTemplate {
    fn from(receipt: &CheckoutReceipt) -> Self {
        Self {
            order_id: receipt.order_id.to_string(),
            total: receipt.total.display(),
            redirect: receipt.redirect.to_string(),
        }
    }
}

// =============================================================================
// Payment history
// =============================================================================

pub struct OrderRow {
    pub order_id: String,
    pub placed: String,
    pub total: String,
    pub status: String,
}

#[derive(Template)]
#[template(path = "orders.txt")]
pub struct OrdersTemplate {
    pub rows: Vec<OrderRow>,
}

impl OrdersTemplate {
    pub fn new(page: &PaymentHistoryPage, currency: CurrencyCode) -> Self {
        Self {
            rows: page
                .orders()
                .iter()
                .map(|order| OrderRow {
                    order_id: order.order_id.to_string(),
                    placed: timestamp(&order.order_date),
                    total: money(order.total_price, currency),
                    status: order.status.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "payment.txt")]
pub struct PaymentTemplate {
    pub payment_id: String,
    pub order_id: String,
    pub method: String,
    pub amount: String,
    pub paid_at: String,
    pub badge: String,
}

impl PaymentTemplate {
    pub fn new(payment: &Payment, currency: CurrencyCode) -> Self {
        let badge = match payment.status.tone() {
            BadgeTone::Success => format!("[✓ {}]", payment.status),
            BadgeTone::Warning => format!("[… {}]", payment.status),
            BadgeTone::Neutral => format!("[{}]", payment.status),
        };

        Self {
            payment_id: payment.payment_id.to_string(),
            order_id: payment.order_id.to_string(),
            method: payment.payment_method.clone(),
            amount: money(payment.amount, currency),
            paid_at: timestamp(&payment.payment_date),
            badge,
        }
    }
}
