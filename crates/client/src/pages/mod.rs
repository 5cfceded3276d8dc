//! Page models.
//!
//! Each page owns the data it fetched plus a [`PageState`]. Actions call the
//! shop API, and only after a response do they replace the page's data
//! wholesale. Failures never escape a page as errors (except checkout, whose
//! outcome the caller must branch on); they become a user-facing message in
//! the page state.

mod cart;
mod login;
mod payments;

pub use cart::{CartPage, CheckoutReceipt};
pub use login::{LoginOutcome, LoginPage};
pub use payments::PaymentHistoryPage;

/// Where a page is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageState {
    /// Nothing fetched yet.
    #[default]
    Loading,
    /// Data is present.
    Ready,
    /// The fetch worked but returned nothing to show.
    Empty(String),
    /// The last action failed.
    Failed(String),
}

impl PageState {
    /// The message to show, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Empty(msg) | Self::Failed(msg) => Some(msg),
            Self::Loading | Self::Ready => None,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_state_message() {
        assert_eq!(PageState::Loading.message(), None);
        assert_eq!(PageState::Ready.message(), None);
        assert_eq!(PageState::Empty("none".into()).message(), Some("none"));
        assert!(PageState::Failed("boom".into()).is_failed());
    }
}
