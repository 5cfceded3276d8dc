//! Navigation targets.
//!
//! Page models return a [`Route`] when an action should move the user
//! elsewhere; the front-end decides what following it means.

use std::fmt;

use meteor_shop_core::OrderId;

/// A page the user can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Products,
    Cart,
    Login,
    Payments,
    /// Order confirmation / detail for a placed order.
    OrderDetail(OrderId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Products => f.write_str("/products"),
            Self::Cart => f.write_str("/cart"),
            Self::Login => f.write_str("/login"),
            Self::Payments => f.write_str("/payments"),
            Self::OrderDetail(id) => write!(f, "/orders?id={id}"),
        }
    }
}
