//! Go Marketplace CLI - Inspect and edit the on-device cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! cart-cli list
//!
//! # Show the raw persisted JSON
//! cart-cli list --json
//!
//! # Add one unit of a product
//! cart-cli add --id a --title "Shoe" --image-url https://img/a.png --price 10
//!
//! # Change quantities
//! cart-cli increment a
//! cart-cli decrement a
//! ```
//!
//! # Commands
//!
//! - `list` - Print the cart
//! - `add` - Add a product (or one more unit of it)
//! - `increment` / `decrement` - Change the quantity of a product already in the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use go_marketplace_cart::{CartConfig, CartSession, FileStore};

mod commands;
mod telemetry;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Go Marketplace cart tools")]
struct Cli {
    /// Directory holding the cart data (overrides `CART_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage key of the cart (overrides `CART_STORAGE_KEY`)
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart, most recently touched first
    List {
        /// Print the persisted JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 19.99)
        #[arg(long)]
        price: String,
    },
    /// Add one unit of a product already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit of a product, dropping it at zero
    Decrement {
        /// Product ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            report_config_error(&e);
            CartConfig::default()
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing(config.log_format);

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Tracing is not initialized yet when configuration fails to load.
#[allow(clippy::print_stderr)]
fn report_config_error(error: &go_marketplace_cart::ConfigError) {
    eprintln!("Ignoring invalid configuration: {error}");
}

async fn run(cli: Cli, mut config: CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(key) = cli.key {
        config.storage_key = key;
    }

    tracing::debug!(data_dir = %config.data_dir.display(), key = %config.storage_key, "Opening cart");

    let session = CartSession::new();
    let cart = session
        .start(Arc::new(FileStore::new(&config.data_dir)), &config)
        .await?;

    let outcome = match cli.command {
        Commands::List { json } => commands::cart::list(&cart, json),
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(&cart, id, title, image_url, &price),
        Commands::Increment { id } => commands::cart::increment(&cart, &id),
        Commands::Decrement { id } => commands::cart::decrement(&cart, &id),
    };

    // Always flush, even when the command itself failed.
    session.end().await;
    outcome?;
    Ok(())
}
