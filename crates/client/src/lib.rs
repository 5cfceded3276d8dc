//! Meteor Shop Client - shop API access and page models.
//!
//! # Architecture
//!
//! - The remote shop API is the source of truth; nothing is cached locally
//! - Every page model is driven through the [`api::ShopApi`] trait, so the
//!   same code runs against [`api::ShopClient`] (reqwest) or a test double
//! - Credentials are injected as a [`session::Session`]; page models never
//!   read the credential store themselves
//!
//! # Example
//!
//! ```rust,ignore
//! use meteor_shop_client::{ShopClient, ShopConfig, pages::CartPage};
//!
//! let config = ShopConfig::from_env()?;
//! let api = ShopClient::new(&config)?;
//! let session = SessionStore::new(&config.session_file).load()?.expect("logged in");
//!
//! let mut cart = CartPage::new(config.currency);
//! cart.load(&api, &session).await;
//! let receipt = cart.checkout(&api, &session).await?;
//! println!("navigate to {}", receipt.redirect);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod pages;
pub mod routes;
pub mod session;

pub use api::{ShopApi, ShopClient};
pub use checkout::{CheckoutError, cart_total, checkout};
pub use config::{ConfigError, ShopConfig};
pub use error::ApiError;
pub use routes::Route;
pub use session::{Session, SessionStore, SessionStoreError};
