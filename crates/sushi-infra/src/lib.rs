//! Infrastructure layer - TOML configuration loaders and CSV menu import

pub mod capacity_loader;
pub mod menu_csv;
pub mod zone_loader;

pub use capacity_loader::load_capacity_table;
pub use menu_csv::{load_menu_csv, parse_menu_csv, MenuCsvError};
pub use zone_loader::load_zone_table;
