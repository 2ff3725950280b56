//! Shopcart CLI - manage a file-backed cart and browse the catalog.
//!
//! # Usage
//!
//! ```bash
//! # Add two gamepads and show the cart
//! shopcart cart add 1 -q 2
//! shopcart cart show
//!
//! # Change quantities, remove, empty
//! shopcart cart update 1 5
//! shopcart cart remove 1
//! shopcart cart clear
//!
//! # Browse the catalog
//! shopcart products list
//! shopcart products search chair -c Furniture
//! ```
//!
//! The cart lives in `SHOPCART_DATA_DIR` (default `.shopcart`), overridable
//! with `--data-dir`. The catalog comes from `--catalog` or
//! `SHOPCART_CATALOG_PATH`, falling back to the built-in demo catalog.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use shopcart_store::{CartStore, Catalog, FileStorage};

mod commands;

#[derive(Parser)]
#[command(name = "shopcart")]
#[command(author, version, about = "Shopcart cart and catalog tools")]
struct Cli {
    /// Directory holding the cart record
    #[arg(long, global = true, env = "SHOPCART_DATA_DIR", default_value = ".shopcart")]
    data_dir: PathBuf,

    /// Product catalog JSON file (defaults to the demo catalog)
    #[arg(long, global = true, env = "SHOPCART_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and totals
    Show,
    /// Add a catalog product
    Add {
        /// Product ID
        id: String,

        /// Units to add; non-numeric or non-positive values add one
        #[arg(short, long, allow_hyphen_values = true)]
        quantity: Option<String>,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        /// Product ID
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Print the grand total including shipping
    Total,
    /// Print the number of units in the cart
    Count,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product
    List,
    /// Show one product and related products
    Show {
        /// Product ID
        id: String,
    },
    /// Search by term and category
    Search {
        /// Text to find in titles and descriptions
        #[arg(default_value = "")]
        term: String,

        /// Category name, or "all"
        #[arg(short, long)]
        category: Option<String>,
    },
}

fn main() {
    // Load .env file if present, before clap reads env defaults
    dotenvy::dotenv().ok();

    // Initialize tracing on stderr; stdout carries command output
    let directives = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &mut std::io::stdout().lock());

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Log filter from `RUST_LOG`-style directives, defaulting to `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, shopcart_store::CatalogError> {
    path.map_or_else(|| Ok(Catalog::demo()), Catalog::load)
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Cart { action } => {
            let store = CartStore::new(FileStorage::new(&cli.data_dir));
            tracing::debug!(data_dir = %cli.data_dir.display(), "Using file storage");

            match action {
                CartAction::Show => commands::cart::show(&store, out)?,
                CartAction::Add { id, quantity } => {
                    commands::cart::add(store, &catalog, &id, quantity.as_deref(), out)?;
                }
                CartAction::Remove { id } => commands::cart::remove(store, &id, out)?,
                CartAction::Update { id, quantity } => {
                    commands::cart::update(store, &id, quantity, out)?;
                }
                CartAction::Clear => commands::cart::clear(&store, out)?,
                CartAction::Total => commands::cart::total(&store, out)?,
                CartAction::Count => commands::cart::count(&store, out)?,
            }
        }
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&catalog, out)?,
            ProductsAction::Show { id } => commands::products::show(&catalog, &id, out)?,
            ProductsAction::Search { term, category } => {
                commands::products::search(&catalog, term, category, out)?;
            }
        },
    }
    Ok(())
}
