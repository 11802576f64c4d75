//! CLI definition using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use sushi_app::app::RequestedItem;
use sushi_domain::model::MovementKind;
use sushi_types::{OrderStatus, OutputFormat, PaymentMethod, Station};

#[derive(Parser)]
#[command(name = "sushi-desk")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Order desk for a sushi delivery kitchen: delivery fees, kitchen ETA, menu and cash shifts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Data directory override
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Verbose output (debug logs on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Price a cart: subtotal, delivery fee and kitchen ETA
    Quote(OrderArgs),

    /// Create and follow orders
    #[command(subcommand)]
    Order(OrderCommand),

    /// Manage the menu catalog
    #[command(subcommand)]
    Menu(MenuCommand),

    /// Cash shift sessions
    #[command(subcommand)]
    Shift(ShiftCommand),

    /// Manage customers
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Validate and format a Chilean RUT
    Rut {
        /// RUT in any common notation (12345678-5, 12.345.678-5)
        value: String,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set store location as "LAT,LNG"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        set_origin: Option<(f64, f64)>,

        /// Set zone table TOML path
        #[arg(long)]
        set_zones: Option<PathBuf>,

        /// Set shift capacity TOML path
        #[arg(long)]
        set_capacity: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Cart and delivery details shared by `quote` and `order create`
#[derive(Args, Clone)]
pub struct OrderArgs {
    /// Menu item as ID or ID:QTY (repeatable)
    #[arg(long = "item", short = 'i', required = true)]
    pub items: Vec<RequestedItem>,

    /// Destination latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Destination longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Customer phone; a saved customer's name and location are reused
    #[arg(long, short = 'p')]
    pub phone: Option<String>,

    /// Customer name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Delivery address
    #[arg(long)]
    pub address: Option<String>,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentMethod::Cash)]
    pub payment: PaymentMethod,

    /// Customer picks up at the counter
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub pickup: bool,
}

#[derive(Subcommand)]
pub enum OrderCommand {
    /// Create an order from a cart
    Create(OrderArgs),

    /// List orders
    List {
        /// Show delivered orders too
        #[arg(long, short = 'a')]
        all: bool,

        /// Limit number of orders shown
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,
    },

    /// Move an order to its next status
    Advance {
        /// Ticket number
        number: u32,
    },

    /// Show an order, or set its status
    Status {
        /// Ticket number
        number: u32,

        /// New status (must be the next lifecycle step)
        #[arg(long)]
        set: Option<OrderStatus>,
    },
}

#[derive(Subcommand)]
pub enum MenuCommand {
    /// List catalog items
    List {
        /// Only available items
        #[arg(long)]
        available: bool,

        /// Filter by category
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// Add or replace an item
    Add {
        id: String,
        name: String,

        #[arg(long, short = 'c')]
        category: String,

        /// Price in CLP
        #[arg(long)]
        price: i64,

        /// Cooking time in minutes
        #[arg(long)]
        minutes: Option<f64>,

        /// Kitchen station (cold, hot); guessed from the name when absent
        #[arg(long)]
        station: Option<Station>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove an item
    Remove { id: String },

    /// Flip an item's availability
    Toggle {
        id: String,

        /// Set explicitly instead of flipping
        #[arg(long)]
        available: Option<bool>,
    },

    /// Import items from CSV
    Import { file: PathBuf },

    /// Reload menu.json if it was edited on disk
    Reload,
}

#[derive(Subcommand)]
pub enum ShiftCommand {
    /// Open a cash shift
    Open {
        /// Cashier name
        #[arg(long, short = 'b')]
        by: String,

        /// Cash in the drawer
        #[arg(long, default_value = "0")]
        cash: i64,
    },

    /// Record a movement in the open shift
    Record {
        /// sale, income, expense
        kind: MovementKind,

        amount: i64,

        #[arg(long, value_enum, default_value_t = PaymentMethod::Cash)]
        method: PaymentMethod,

        #[arg(long, short = 'd', default_value = "")]
        description: String,
    },

    /// Close the open shift with the counted cash
    Close {
        #[arg(long)]
        counted: i64,
    },

    /// Show the open or most recent shift
    Status {
        /// Shift id (or prefix)
        #[arg(long)]
        id: Option<String>,
    },

    /// Export a shift report to Excel
    Export {
        /// Shift id (or prefix); open or most recent shift by default
        #[arg(long)]
        id: Option<String>,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CustomerCommand {
    /// Register or update a customer (matched by phone)
    Add {
        name: String,
        phone: String,

        #[arg(long)]
        rut: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List customers
    List,
}

fn parse_coordinate(s: &str) -> Result<(f64, f64), String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{}'", s))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude '{}'", lat))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude '{}'", lng))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("coordinate out of range: {}", s));
    }
    Ok((lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("-33.45,-70.66").unwrap(), (-33.45, -70.66));
        assert!(parse_coordinate("-33.45").is_err());
        assert!(parse_coordinate("-133.45,-70.66").is_err());
    }

    #[test]
    fn test_quote_args() {
        let cli = Cli::try_parse_from([
            "sushi-desk", "quote", "--item", "R1:2", "-i", "H1", "--lat", "-33.41", "--lng", "-70.60",
        ])
        .unwrap();
        match cli.command {
            Commands::Quote(args) => {
                assert_eq!(args.items.len(), 2);
                assert_eq!(args.items[0], RequestedItem::new("R1", 2));
                assert_eq!(args.lat, Some(-33.41));
            }
            _ => panic!("expected quote"),
        }
    }

    #[test]
    fn test_pickup_conflicts_with_destination() {
        let parsed = Cli::try_parse_from([
            "sushi-desk", "order", "create", "-i", "R1", "--pickup", "--lat", "-33.4", "--lng", "-70.6",
        ]);
        assert!(parsed.is_err());
    }
}
