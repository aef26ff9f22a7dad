//! Kedai CLI - the coffee-shop storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! kedai menu list
//! kedai menu list --category coffee
//!
//! # Build a cart (state survives between invocations)
//! kedai cart add M1 --quantity 2
//! kedai cart note M1 "less sugar"
//! kedai cart show
//!
//! # Sign in and place the order
//! kedai auth login -e ari@example.com -p secret
//! kedai checkout --table 4
//!
//! # Reserve a table
//! kedai reserve --table 3 --name Ari --phone +62-812-0000 \
//!     --party-size 4 --at 2025-11-02T18:00:00Z
//! ```
//!
//! # Environment Variables
//!
//! - `KEDAI_API_BASE_URL` - Backend base URL (required)
//! - `KEDAI_DATA_DIR` - Snapshot directory (default: `.kedai`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "kedai")]
#[command(author, version, about = "Kedai coffee-shop storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the menu
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Account operations
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Reserve a table
    Reserve {
        /// Table number
        #[arg(long)]
        table: u32,

        /// Name the reservation is held under
        #[arg(long)]
        name: String,

        /// Contact phone number
        #[arg(long)]
        phone: String,

        /// Number of guests
        #[arg(long)]
        party_size: u32,

        /// Start time (RFC 3339, e.g. 2025-11-02T18:00:00Z)
        #[arg(long)]
        at: String,
    },
    /// Place an order from the cart
    Checkout {
        /// Name for the order (walk-in customers)
        #[arg(long)]
        name: Option<String>,

        /// Table to bring the order to
        #[arg(long)]
        table: Option<u32>,

        /// Order notes for the kitchen
        #[arg(long)]
        notes: Option<String>,
    },
    /// List orders placed by this session
    Orders,
}

#[derive(Subcommand)]
enum MenuAction {
    /// List menu items
    List {
        /// Filter by category slug
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List menu categories
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a menu item by its identifier
    Add {
        /// Menu item identifier
        item_id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a line (0 removes it)
    Quantity {
        /// Menu item identifier
        item_id: String,

        /// New quantity
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Menu item identifier
        item_id: String,
    },
    /// Attach a note to a line
    Note {
        /// Menu item identifier
        item_id: String,

        /// Note text (e.g. "less sugar")
        note: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out (local only)
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; notifications surface here too
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::bootstrap().await?;

    match cli.command {
        Commands::Menu { action } => match action {
            MenuAction::List { category } => {
                commands::menu::list(&ctx, category.as_deref()).await?;
            }
            MenuAction::Categories => commands::menu::categories(&ctx).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add { item_id, quantity } => {
                commands::cart::add(&ctx, &item_id, quantity).await?;
            }
            CartAction::Quantity { item_id, quantity } => {
                commands::cart::set_quantity(&ctx, &item_id, quantity).await?;
            }
            CartAction::Remove { item_id } => commands::cart::remove(&ctx, &item_id).await?,
            CartAction::Note { item_id, note } => {
                commands::cart::note(&ctx, &item_id, &note).await?;
            }
            CartAction::Clear => commands::cart::clear(&ctx).await?,
        },
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&ctx, email, password).await?;
            }
            AuthAction::Register {
                name,
                email,
                password,
            } => commands::auth::register(&ctx, name, email, password).await?,
            AuthAction::Logout => commands::auth::logout(&ctx),
            AuthAction::Whoami => commands::auth::whoami(&ctx),
        },
        Commands::Reserve {
            table,
            name,
            phone,
            party_size,
            at,
        } => commands::reserve::reserve(&ctx, table, &name, &phone, party_size, &at).await?,
        Commands::Checkout { name, table, notes } => {
            commands::cart::checkout(&ctx, name, table, notes).await?;
        }
        Commands::Orders => commands::cart::orders(&ctx).await?,
    }

    Ok(())
}
