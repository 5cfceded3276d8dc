//! Status enums for orders and payments.
//!
//! The shop API reports statuses as free-form strings. Known values map to
//! variants; anything else is preserved verbatim in `Other` so it can still
//! be shown to the user.

use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Newly created; every checkout submits this.
    #[default]
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
    /// A status this client does not know about.
    Other(String),
}

impl OrderStatus {
    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Shipped => "Shipped",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Pending" => Self::Pending,
            "Paid" => Self::Paid,
            "Shipped" => Self::Shipped,
            "Completed" => Self::Completed,
            "Cancelled" => Self::Cancelled,
            _ => Self::Other(s),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Completed,
    Pending,
    /// Any other server-supplied status, shown neutrally.
    Other(String),
}

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeTone {
    Success,
    Warning,
    Neutral,
}

impl PaymentStatus {
    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::Other(s) => s,
        }
    }

    /// Badge tone used when rendering this status.
    #[must_use]
    pub const fn tone(&self) -> BadgeTone {
        match self {
            Self::Completed => BadgeTone::Success,
            Self::Pending => BadgeTone::Warning,
            Self::Other(_) => BadgeTone::Neutral,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Completed" => Self::Completed,
            "Pending" => Self::Pending,
            _ => Self::Other(s),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
