//! Menu catalog store with hot reload and change notifications
//!
//! The catalog lives in `menu.json` as a list of items sorted by id so it can be
//! edited by hand. [`MenuStore::reload_if_changed`] picks up such edits by comparing
//! the SHA-256 of the file against the last committed state.
//!
//! Subscribers are called synchronously, in registration order, after every
//! committed change. A subscriber that fails or panics is logged and skipped.

use std::collections::HashMap;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use sushi_domain::model::MenuItem;
use sushi_domain::repository::MenuRepository;
use sushi_domain::service::StationClassifier;
use sushi_types::{Error, Result, StoreError};

pub type SubscriptionId = u64;

/// Callback invoked after a committed catalog change
pub type CatalogSubscriber = Box<dyn FnMut(&CatalogEvent) -> std::result::Result<(), String>>;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    Upserted { id: String },
    Removed { id: String },
    AvailabilityChanged { id: String, available: bool },
    /// File changed on disk and was reloaded
    Reloaded { item_count: usize },
}

pub struct MenuStore {
    store_path: PathBuf,
    items: HashMap<String, MenuItem>,
    content_hash: Option<String>,
    subscribers: Vec<(SubscriptionId, CatalogSubscriber)>,
    next_subscription: SubscriptionId,
}

impl MenuStore {
    /// Create or load the catalog in `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("menu.json");

        let mut store = Self {
            store_path,
            items: HashMap::new(),
            content_hash: None,
            subscribers: Vec::new(),
            next_subscription: 1,
        };

        if store.store_path.exists() {
            let bytes = fs::read(&store.store_path)?;
            store.items = parse_catalog(&bytes)?;
            store.content_hash = Some(hash_bytes(&bytes));
        }

        tracing::debug!(path = %store.store_path.display(), items = store.items.len(), "menu store opened");
        Ok(store)
    }

    /// Path of `menu.json`
    pub fn path(&self) -> &Path {
        &self.store_path
    }

    /// Write `items` to disk, then make them the in-memory catalog
    fn commit(&mut self, items: HashMap<String, MenuItem>) -> Result<()> {
        let mut sorted: Vec<&MenuItem> = items.values().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));
        let bytes = serde_json::to_vec_pretty(&sorted)?;
        fs::write(&self.store_path, &bytes)?;
        self.items = items;
        self.content_hash = Some(hash_bytes(&bytes));
        Ok(())
    }

    /// Reload from disk when the file content differs from the last committed state
    ///
    /// Returns `Ok(true)` when a reload happened. A file that fails to parse leaves
    /// the in-memory catalog untouched.
    pub fn reload_if_changed(&mut self) -> Result<bool> {
        if !self.store_path.exists() {
            return Ok(false);
        }
        let bytes = fs::read(&self.store_path)?;
        let hash = hash_bytes(&bytes);
        if self.content_hash.as_deref() == Some(hash.as_str()) {
            return Ok(false);
        }

        let items = parse_catalog(&bytes)?;
        self.items = items;
        self.content_hash = Some(hash);
        tracing::info!(items = self.items.len(), "menu catalog reloaded from disk");
        self.notify(&CatalogEvent::Reloaded {
            item_count: self.items.len(),
        });
        Ok(true)
    }

    /// Register a callback; returns its handle for [`MenuStore::unsubscribe`]
    pub fn subscribe(&mut self, subscriber: CatalogSubscriber) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    /// Drop a subscriber; `false` when the id is unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self, event: &CatalogEvent) {
        for (id, subscriber) in self.subscribers.iter_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| subscriber(event))) {
                Ok(Ok(())) => {}
                Ok(Err(message)) => {
                    tracing::warn!(subscription = *id, error = %message, "catalog subscriber failed");
                }
                Err(_) => {
                    tracing::warn!(subscription = *id, "catalog subscriber panicked");
                }
            }
        }
    }

    /// Insert or replace an item
    pub fn upsert(&mut self, item: MenuItem) -> Result<()> {
        let id = item.id.clone();
        let mut items = self.items.clone();
        items.insert(id.clone(), item);
        self.commit(items)?;
        self.notify(&CatalogEvent::Upserted { id });
        Ok(())
    }

    /// Remove an item; `Ok(false)` when it was not in the catalog
    pub fn remove_item(&mut self, id: &str) -> Result<bool> {
        if !self.items.contains_key(id) {
            return Ok(false);
        }
        let mut items = self.items.clone();
        items.remove(id);
        self.commit(items)?;
        self.notify(&CatalogEvent::Removed { id: id.to_string() });
        Ok(true)
    }

    /// Mark an item available or sold out
    pub fn set_availability(&mut self, id: &str, available: bool) -> Result<()> {
        let current = self
            .items
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("menu item {}", id)))?;
        if current.available == available {
            return Ok(());
        }
        let mut items = self.items.clone();
        if let Some(item) = items.get_mut(id) {
            item.available = available;
        }
        self.commit(items)?;
        self.notify(&CatalogEvent::AvailabilityChanged {
            id: id.to_string(),
            available,
        });
        Ok(())
    }

    /// Item by id
    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.get(id)
    }

    /// All items sorted by category, then name
    pub fn all_items(&self) -> Vec<&MenuItem> {
        let mut items: Vec<_> = self.items.values().collect();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        items
    }

    /// Available items, sorted like `all_items`
    pub fn available_items(&self) -> Vec<&MenuItem> {
        self.all_items().into_iter().filter(|i| i.available).collect()
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.items.values().map(|i| i.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Station lookup built from declared item stations
    pub fn classifier(&self) -> StationClassifier {
        StationClassifier::from_menu(self.items.values())
    }

    /// Number of items
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

impl MenuRepository for MenuStore {
    fn save(&mut self, item: MenuItem) -> std::result::Result<(), Error> {
        self.upsert(item)
    }

    fn remove(&mut self, id: &str) -> std::result::Result<bool, Error> {
        self.remove_item(id)
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<MenuItem>, Error> {
        Ok(self.items.get(id).cloned())
    }

    fn find_all(&self) -> std::result::Result<Vec<MenuItem>, Error> {
        Ok(self.all_items().into_iter().cloned().collect())
    }
}

fn parse_catalog(bytes: &[u8]) -> Result<HashMap<String, MenuItem>> {
    let items: Vec<MenuItem> = serde_json::from_slice(bytes)
        .map_err(|e| StoreError::Corrupted(format!("menu catalog: {}", e)))?;
    Ok(items.into_iter().map(|item| (item.id.clone(), item)).collect())
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
