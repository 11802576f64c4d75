//! Customer records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sushi_types::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// Normalized E.164 form (+569XXXXXXXX)
    pub phone: String,
    #[serde(default)]
    pub rut: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Geocoded delivery point
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Customer with a normalized phone
    pub fn new(name: String, phone: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            phone,
            rut: None,
            address: None,
            location: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Set the delivery address and its coordinate
    pub fn with_address(mut self, address: String, location: Option<Coordinate>) -> Self {
        self.address = Some(address);
        self.location = location;
        self
    }

    /// Set the formatted RUT
    pub fn with_rut(mut self, rut: String) -> Self {
        self.rut = Some(rut);
        self
    }
}
