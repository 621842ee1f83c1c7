//! Poppin Deli CLI - Menu, cart and pickup checkout from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu, optionally searching and filtering by tag
//! pd-cli menu --search coffee --tag bestseller
//!
//! # Build a cart
//! pd-cli cart add 1
//! pd-cli cart set 1 3
//! pd-cli cart show
//!
//! # Place the order and get the WhatsApp link
//! pd-cli order --name Asha --phone "98765 43210" --time 18:30 --payment-proof upi.png
//! ```
//!
//! # Commands
//!
//! - `menu`, `status`, `specials`, `reviews` - Read site content
//! - `ask`, `chat` - Print WhatsApp links for questions and general chat
//! - `cache clear` - Drop cached feed data
//! - `cart` - Inspect and edit the persisted cart
//! - `order` - Run the checkout and print the order link

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use poppin_deli_storefront::AppState;
use poppin_deli_storefront::config::SiteConfig;

mod commands;

#[derive(Parser)]
#[command(name = "pd-cli")]
#[command(author, version, about = "Poppin Deli ordering tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu
    Menu {
        /// Case-insensitive text to look for in name, description or category
        #[arg(short, long)]
        search: Option<String>,

        /// Only items carrying any of these tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Show the live shop status
    Status,
    /// Show today's specials
    Specials,
    /// Show customer reviews
    Reviews,
    /// Print a WhatsApp link asking about one menu item
    Ask {
        /// Menu item id
        id: String,
    },
    /// Print a WhatsApp link to chat with the shop
    Chat {
        /// Message to prefill instead of the greeting
        message: Option<String>,
    },
    /// Manage cached feed data
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place a pickup order and print the WhatsApp link
    Order {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer phone number
        #[arg(short, long)]
        phone: String,

        /// Pickup time
        #[arg(short, long)]
        time: String,

        /// Special instructions
        #[arg(long)]
        notes: Option<String>,

        /// Path to the payment screenshot
        #[arg(long)]
        payment_proof: PathBuf,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove every cached feed
    Clear,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and billing
    Show,
    /// Add one unit of a menu item
    Add {
        /// Menu item id
        id: String,
    },
    /// Remove one unit of an item
    Remove {
        /// Menu item id
        id: String,
    },
    /// Set the quantity of an item already in the cart
    Set {
        /// Menu item id
        id: String,
        /// New quantity; 0 removes the item
        quantity: u32,
    },
    /// Remove an item entirely
    Delete {
        /// Menu item id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Set the GST percentage
    Tax {
        /// Percentage, e.g. 5 or 12%
        percent: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("poppin_deli_cli=info,poppin_deli_storefront=info")
        }))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = SiteConfig::from_env()?;
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Menu { search, tags } => commands::content::menu(&state, search, tags).await?,
        Commands::Status => commands::content::status(&state).await?,
        Commands::Specials => commands::content::specials(&state).await?,
        Commands::Reviews => commands::content::reviews(&state).await?,
        Commands::Ask { id } => commands::contact::ask(&state, &id).await?,
        Commands::Chat { message } => commands::contact::chat(&state, message.as_deref())?,
        Commands::Cache { action } => match action {
            CacheAction::Clear => commands::content::clear_cache(&state).await,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state)?,
            CartAction::Add { id } => commands::cart::add(&state, &id).await?,
            CartAction::Remove { id } => commands::cart::remove(&state, &id)?,
            CartAction::Set { id, quantity } => commands::cart::set(&state, &id, quantity)?,
            CartAction::Delete { id } => commands::cart::delete(&state, &id)?,
            CartAction::Clear => commands::cart::clear(&state)?,
            CartAction::Tax { percent } => commands::cart::tax(&state, &percent)?,
        },
        Commands::Order {
            name,
            phone,
            time,
            notes,
            payment_proof,
        } => {
            let customer = poppin_deli_core::order::CustomerInfo {
                name,
                phone,
                pickup_time: time,
                notes,
            };
            commands::order::place(&state, customer, &payment_proof).await?;
        }
    }
    Ok(())
}
