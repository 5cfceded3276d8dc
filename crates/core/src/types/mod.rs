//! Core types for Meteor Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod token;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
pub use token::AuthToken;
