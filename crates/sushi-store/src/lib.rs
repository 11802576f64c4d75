//! Persistent JSON stores for the sushi-desk workspace

pub mod menu;
pub mod orders;
pub mod shifts;

pub use menu::{CatalogEvent, CatalogSubscriber, MenuStore, SubscriptionId};
pub use orders::OrderStore;
pub use shifts::ShiftStore;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use sushi_types::Result;

/// Read a JSON file, falling back to the default when missing or unreadable
pub(crate) fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    match serde_json::from_reader(reader) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "store file unreadable, starting empty");
            Ok(T::default())
        }
    }
}
