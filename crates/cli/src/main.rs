//! Tiffin CLI - order food from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! tiffin menu --query "paneer" --category Mains
//!
//! # Check credentials; the token is written to $HOME/.tiffin/session.json
//! tiffin -e asha@example.com login
//!
//! # Every command that acts as a user signs in again with --email and
//! # --password (or TIFFIN_EMAIL / TIFFIN_PASSWORD)
//! tiffin -e asha@example.com cart add 12
//! tiffin -e asha@example.com cart checkout
//!
//! # Profile and delivery addresses
//! tiffin -e asha@example.com profile update --name "Asha K"
//! tiffin -e asha@example.com profile add-address --street "12 MG Road" \
//!     --city Pune --state MH --zip 411001 --country India
//!
//! # Admin
//! tiffin -e admin@example.com admin status 7 delivered
//! ```
//!
//! # Environment Variables
//!
//! - `TIFFIN_EMAIL` / `TIFFIN_PASSWORD` - Credentials for commands that need a user
//! - `TIFFIN_API_BASE_URL`, `TIFFIN_TOKEN_FILE`, `TIFFIN_REQUEST_TIMEOUT_SECS` -
//!   see `tiffin_client::config`
//! - `SENTRY_DSN` - Error tracking
//! - `RUST_LOG` - Log filter (default: `tiffin_client=info,tiffin_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tiffin_client::{App, ClientConfig};
use tiffin_core::AddressDetails;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::CliError;

#[derive(Parser)]
#[command(name = "tiffin")]
#[command(author, version, about = "Tiffin food-ordering client")]
struct Cli {
    /// Account email for commands that need a signed-in user
    #[arg(short, long, global = true, env = "TIFFIN_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(short, long, global = true, env = "TIFFIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login,
    /// Create an account with --email and --password
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password confirmation
        #[arg(short, long)]
        confirm: String,
    },
    /// Sign out and forget the session token
    Logout,
    /// Show the menu, optionally filtered
    Menu {
        /// Search text matched against names and descriptions
        #[arg(short, long, default_value = "")]
        query: String,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List menu categories
    Categories,
    /// Manage your cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place and track orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Read and write reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// View and edit your account and delivery addresses
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Administer food, orders, and users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents
    Show,
    /// Add one unit of a food item
    Add { food_id: String },
    /// Remove a food item
    Remove { food_id: String },
    /// Empty the cart
    Clear,
    /// Order everything in the cart
    Checkout,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List your orders
    List,
    /// Show one order
    Show { id: String },
    /// Order the contents of your cart
    Place,
    /// Cancel an order
    Cancel { id: String },
    /// Pay for an order
    Pay {
        id: String,

        /// Payment method (`credit_card`, `paypal`, `cash`)
        #[arg(short, long, default_value = "cash")]
        method: String,

        /// Card number, for `credit_card`
        #[arg(long)]
        card_number: Option<String>,

        /// Card expiry (MM/YY), for `credit_card`
        #[arg(long)]
        expiry: Option<String>,

        /// Card security code, for `credit_card`
        #[arg(long)]
        cvv: Option<String>,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Show reviews of a food item
    List { food_id: String },
    /// Review a food item
    Add {
        food_id: String,

        /// Rating from 1 to 5
        #[arg(short, long)]
        rating: u8,

        /// Review text
        #[arg(short, long)]
        content: String,
    },
    /// Delete a review
    Delete { id: String },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show your account and saved addresses
    Show,
    /// Change your name or email
    Update {
        #[arg(short, long)]
        name: Option<String>,

        /// New account email
        #[arg(long)]
        new_email: Option<String>,
    },
    /// List saved addresses
    Addresses,
    /// Save a delivery address
    AddAddress {
        #[arg(long)]
        street: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zip: String,
        #[arg(long)]
        country: String,

        /// Save without marking it as the default address
        #[arg(long)]
        not_default: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List customer accounts
    Users,
    /// List every order
    Orders,
    /// Change an order's status
    Status {
        id: String,
        /// New status (`pending`, `processing`, `delivered`, `cancelled`)
        status: String,
    },
    /// Add a menu item
    FoodAdd {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Price in dollars, e.g. 12.50
        #[arg(long)]
        price: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Edit a menu item
    FoodEdit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a menu item
    FoodDelete { id: String },
    /// Delete a customer account
    DeleteUser { id: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet.
            let _ = writeln!(std::io::stderr(), "Configuration error: {e}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr; stdout is for command output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tiffin_client=info,tiffin_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CliError> {
    let app = App::from_config(config)?;
    let identity = commands::Identity::new(cli.email, cli.password);
    let out = &mut std::io::stdout().lock();

    match cli.command {
        Commands::Login => commands::auth::login(&app, &identity, out).await,
        Commands::Register { name, confirm } => {
            commands::auth::register(&app, &identity, &name, &confirm, out).await
        }
        Commands::Logout => commands::auth::logout(&app, out).await,
        Commands::Menu { query, category } => {
            commands::menu::menu(&app, &query, category, out).await
        }
        Commands::Categories => commands::menu::categories(&app, out).await,
        Commands::Cart { action } => {
            identity.sign_in(&app).await?;
            match action {
                CartAction::Show => commands::cart::show(&app, out).await,
                CartAction::Add { food_id } => commands::cart::add(&app, &food_id, out).await,
                CartAction::Remove { food_id } => {
                    commands::cart::remove(&app, &food_id, out).await
                }
                CartAction::Clear => commands::cart::clear(&app, out).await,
                CartAction::Checkout => commands::cart::checkout(&app, out).await,
            }
        }
        Commands::Orders { action } => {
            identity.sign_in(&app).await?;
            match action {
                OrderAction::List => commands::orders::list(&app, out).await,
                OrderAction::Show { id } => commands::orders::show(&app, &id, out).await,
                OrderAction::Place => commands::orders::place(&app, out).await,
                OrderAction::Cancel { id } => commands::orders::cancel(&app, &id, out).await,
                OrderAction::Pay {
                    id,
                    method,
                    card_number,
                    expiry,
                    cvv,
                } => {
                    let details =
                        commands::orders::payment_details(&method, card_number, expiry, cvv)?;
                    commands::orders::pay(&app, &id, &details, out).await
                }
            }
        }
        Commands::Reviews { action } => match action {
            ReviewAction::List { food_id } => commands::reviews::list(&app, &food_id, out).await,
            ReviewAction::Add {
                food_id,
                rating,
                content,
            } => {
                identity.sign_in(&app).await?;
                commands::reviews::add(&app, &food_id, rating, &content, out).await
            }
            ReviewAction::Delete { id } => {
                identity.sign_in(&app).await?;
                commands::reviews::delete(&app, &id, out).await
            }
        },
        Commands::Profile { action } => {
            identity.sign_in(&app).await?;
            match action {
                ProfileAction::Show => commands::profile::show(&app, out).await,
                ProfileAction::Update { name, new_email } => {
                    let patch = commands::profile::user_patch(name, new_email.as_deref())?;
                    commands::profile::update(&app, &patch, out).await
                }
                ProfileAction::Addresses => commands::profile::addresses(&app, out).await,
                ProfileAction::AddAddress {
                    street,
                    city,
                    state,
                    zip,
                    country,
                    not_default,
                } => {
                    let details = commands::profile::address_details(AddressDetails {
                        street,
                        city,
                        state,
                        zip_code: zip,
                        country,
                        is_default: !not_default,
                    })?;
                    commands::profile::add_address(&app, details, out).await
                }
            }
        }
        Commands::Admin { action } => {
            identity.sign_in(&app).await?;
            match action {
                AdminAction::Users => commands::admin::users(&app, out).await,
                AdminAction::Orders => commands::admin::orders(&app, out).await,
                AdminAction::Status { id, status } => {
                    commands::admin::set_status(&app, &id, &status, out).await
                }
                AdminAction::FoodAdd {
                    name,
                    description,
                    price,
                    category,
                    image,
                } => {
                    let item = commands::admin::new_food_item(
                        name,
                        description,
                        &price,
                        category,
                        image,
                    )?;
                    commands::admin::add_food(&app, &item, out).await
                }
                AdminAction::FoodEdit {
                    id,
                    name,
                    description,
                    price,
                    category,
                    image,
                } => {
                    let patch = commands::admin::food_patch(
                        name,
                        description,
                        price.as_deref(),
                        category,
                        image,
                    )?;
                    commands::admin::edit_food(&app, &id, &patch, out).await
                }
                AdminAction::FoodDelete { id } => {
                    commands::admin::delete_food(&app, &id, out).await
                }
                AdminAction::DeleteUser { id } => {
                    commands::admin::delete_user(&app, &id, out).await
                }
            }
        }
    }
}
