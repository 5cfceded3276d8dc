//! Command implementations.
//!
//! Each command loads what it needs from [`Context`], drives one page model,
//! and renders the result to stdout.

use std::io::{BufRead, Write};

use meteor_shop_client::{
    ApiError, CheckoutError, Session, SessionStore, SessionStoreError, ShopClient, ShopConfig,
};
use meteor_shop_core::OrderId;
use thiserror::Error;

pub mod auth;
pub mod cart;
pub mod payments;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// HTTP client could not be built.
    #[error("Client setup error: {0}")]
    Client(#[from] ApiError),

    /// Session file problem.
    #[error(transparent)]
    Session(#[from] SessionStoreError),

    /// No stored session.
    #[error("Not logged in. Run `meteor login` first.")]
    NotLoggedIn,

    /// A page reported a failure to the user.
    #[error("{0}")]
    Page(String),

    /// Checkout stopped early.
    #[error("{}", .0.user_message())]
    Checkout(#[from] CheckoutError),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Writing output or reading a confirmation failed.
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Order placed by a checkout that did not fully finish.
    pub const fn placed_order(&self) -> Option<OrderId> {
        match self {
            Self::Checkout(err) => err.placed_order(),
            _ => None,
        }
    }
}

/// Everything a command needs.
pub struct Context {
    pub config: ShopConfig,
    pub api: ShopClient,
    pub store: SessionStore,
}

impl Context {
    /// Build the HTTP client and session store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ShopConfig) -> Result<Self, CommandError> {
        let api = ShopClient::new(&config)?;
        let store = SessionStore::new(config.session_file.clone());
        Ok(Self { config, api, store })
    }

    /// The stored session, required for every command except login.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` if there is no session.
    pub fn session(&self) -> Result<Session, CommandError> {
        self.store.load()?.ok_or(CommandError::NotLoggedIn)
    }
}

/// Write rendered output to stdout.
pub fn emit(text: &str) -> Result<(), CommandError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` is no.
pub fn confirm(question: &str) -> Result<bool, CommandError> {
    {
        let mut stderr = std::io::stderr().lock();
        write!(stderr, "{question} [y/N] ")?;
        stderr.flush()?;
    }

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
