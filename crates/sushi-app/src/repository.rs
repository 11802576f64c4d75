//! Store openers backed by the configured data directory

use std::path::PathBuf;

use sushi_store::{MenuStore, OrderStore, ShiftStore};
use sushi_types::Result;

use crate::config::Config;

/// Open the menu catalog
pub fn open_menu_store(config: &Config) -> Result<MenuStore> {
    let store_dir = config.store_dir()?;
    MenuStore::open(store_dir)
}

/// Open the order and customer store
pub fn open_order_store(config: &Config) -> Result<OrderStore> {
    let store_dir = config.store_dir()?;
    OrderStore::open(store_dir)
}

/// Open the cash shift store
pub fn open_shift_store(config: &Config) -> Result<ShiftStore> {
    let store_dir = config.store_dir()?;
    ShiftStore::open(store_dir)
}

/// Open the menu catalog at a custom directory
pub fn open_menu_store_at(store_dir: PathBuf) -> Result<MenuStore> {
    MenuStore::open(store_dir)
}

/// Open the order and customer store at a custom directory
pub fn open_order_store_at(store_dir: PathBuf) -> Result<OrderStore> {
    OrderStore::open(store_dir)
}

/// Open the cash shift store at a custom directory
pub fn open_shift_store_at(store_dir: PathBuf) -> Result<ShiftStore> {
    ShiftStore::open(store_dir)
}
