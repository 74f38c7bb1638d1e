//! Corner Store CLI - catalog browsing, a local cart and migrations.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! cs-cli catalog list --category electronics --max-price 100
//! cs-cli catalog categories
//!
//! # Work with a cart kept in .cornerstore/
//! cs-cli cart add 1
//! cs-cli cart set 1 3
//! cs-cli cart show
//!
//! # Create the session table for database-backed storefront sessions
//! cs-cli migrate sessions
//! ```
//!
//! # Commands
//!
//! - `catalog` - List and filter products, list categories
//! - `cart` - Show and mutate the local cart
//! - `migrate` - Run database migrations

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cornerstore_core::{ProductFilter, ProductId};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Corner Store CLI tools")]
struct Cli {
    /// Directory the local cart is stored in
    #[arg(long, global = true, default_value = commands::cart::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally filtered
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List product categories
    Categories,
}

#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive text to find in title or description
    #[arg(short, long, default_value = "")]
    search: String,

    /// Lowest price to show
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Highest price to show
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Lowest average rating to show (0-5)
    #[arg(long)]
    min_rating: Option<f64>,

    /// Exact category label
    #[arg(short, long, default_value = "")]
    category: String,
}

impl From<FilterArgs> for ProductFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            search: args.search,
            min_price: args.min_price,
            max_price: args.max_price,
            min_rating: args.min_rating,
            category: args.category,
        }
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one unit of a product
    Add {
        /// Catalog product id
        id: i32,
    },
    /// Set the quantity of a product already in the cart (0 or less removes it)
    Set {
        /// Catalog product id
        id: i32,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove {
        /// Catalog product id
        id: i32,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the storefront session table
    Sessions,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
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
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { filter } => commands::catalog::list(&filter.into()).await?,
            CatalogAction::Categories => commands::catalog::categories().await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&data_dir)?,
            CartAction::Add { id } => commands::cart::add(&data_dir, ProductId::new(id)).await?,
            CartAction::Set { id, quantity } => {
                commands::cart::set(&data_dir, ProductId::new(id), quantity)?;
            }
            CartAction::Remove { id } => commands::cart::remove(&data_dir, ProductId::new(id))?,
            CartAction::Clear => commands::cart::clear(&data_dir)?,
        },
        Commands::Migrate { target } => match target {
            MigrateTarget::Sessions => commands::migrate::sessions().await?,
        },
    }
    Ok(())
}
