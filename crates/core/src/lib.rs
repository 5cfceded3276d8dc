//! Meteor Shop Core - Shared types library.
//!
//! This crate provides common types used across all Meteor Shop components:
//! - `client` - Typed shop API client, page models, and checkout
//! - `cli` - The `meteor` terminal front-end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! filesystem access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, tokens, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
