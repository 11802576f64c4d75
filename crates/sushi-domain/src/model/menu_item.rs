//! Menu catalog entry

use serde::{Deserialize, Serialize};
use sushi_types::{CartLine, Clp, Station};

/// Catalog entry offered to customers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable SKU (e.g., "R-ACV-10")
    pub id: String,
    pub name: String,
    /// Rolls, Promos, Hot, Drinks...
    pub category: String,
    pub price: Clp,
    #[serde(default)]
    pub cooking_time_minutes: Option<f64>,
    /// Declared kitchen line; the name heuristic is used when absent
    #[serde(default)]
    pub station: Option<Station>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    /// Available item with no cooking time or declared station
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>, price: Clp) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            cooking_time_minutes: None,
            station: None,
            available: true,
            description: None,
        }
    }

    /// Set the cooking time in minutes
    pub fn with_cooking_time(mut self, minutes: f64) -> Self {
        self.cooking_time_minutes = Some(minutes);
        self
    }

    /// Declare the kitchen station
    pub fn with_station(mut self, station: Station) -> Self {
        self.station = Some(station);
        self
    }

    /// Cart line for station load
    pub fn cart_line(&self) -> CartLine {
        CartLine {
            item_id: self.id.clone(),
            name: self.name.clone(),
            cooking_time_minutes: self.cooking_time_minutes,
        }
    }
}
