//! Meteor Shop CLI - cart, checkout, and payment history from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password from --password or METEOR_PASSWORD)
//! meteor login -e buyer@example.com
//!
//! # Show the cart and its total
//! meteor cart show
//!
//! # Remove one line / everything (asks first unless -y)
//! meteor cart remove 12
//! meteor cart clear -y
//!
//! # Turn the cart into an order
//! meteor checkout
//!
//! # Payment history
//! meteor orders
//! meteor payment 57
//! ```
//!
//! # Exit codes
//!
//! - `0` - success
//! - `1` - the command failed and nothing changed on the server
//! - `2` - checkout placed the order but could not clear the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use meteor_shop_client::ShopConfig;
use meteor_shop_core::{CartId, CustomerId, OrderId};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::{CommandError, Context};

#[derive(Parser)]
#[command(name = "meteor")]
#[command(author, version, about = "Meteor Shop terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "METEOR_PASSWORD", hide_env_values = true)]
        password: String,

        /// Customer id to use if the shop does not return one
        #[arg(short, long)]
        customer_id: Option<CustomerId>,
    },
    /// Forget the stored session
    Logout,
    /// Inspect or edit the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout,
    /// List your orders
    Orders,
    /// Show the payment recorded for an order
    Payment {
        /// Order id
        order_id: OrderId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and the total
    Show,
    /// Remove one line
    Remove {
        /// Cart line id (the `#` column)
        cart_id: CartId,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove every line
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "meteor_shop_cli=info,meteor_shop_client=info".into());

    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ShopConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        let code = if e.placed_order().is_some() { 2 } else { 1 };
        std::process::exit(code);
    }
}

async fn run(cli: Cli, config: ShopConfig) -> Result<(), CommandError> {
    let ctx = Context::new(config)?;

    match cli.command {
        Commands::Login {
            email,
            password,
            customer_id,
        } => commands::auth::login(&ctx, &email, password, customer_id).await,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx).await,
            CartAction::Remove { cart_id, yes } => commands::cart::remove(&ctx, cart_id, yes).await,
            CartAction::Clear { yes } => commands::cart::clear(&ctx, yes).await,
        },
        Commands::Checkout => commands::cart::checkout(&ctx).await,
        Commands::Orders => commands::payments::orders(&ctx).await,
        Commands::Payment { order_id } => commands::payments::payment(&ctx, order_id).await,
    }
}
