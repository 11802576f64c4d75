//! Zone table loader from TOML
//!
//! ```toml
//! [[zones]]
//! name = "Zona 1"
//! radius_km = 3.0
//! fee = 1500
//!
//! [[zones]]
//! name = "Zona extendida"   # no radius: catch-all
//! fee = 5000
//! ```

use std::fs;
use std::path::Path;

use sushi_domain::model::ZoneTable;
use sushi_types::{ConfigError, Error, Result};

/// Load and validate a zone table from a TOML file
pub fn load_zone_table(path: &Path) -> Result<ZoneTable> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(ConfigError::ParseError(format!(
            "Failed to read zone table {}: {}",
            path.display(),
            e
        )))
    })?;
    let table = load_zone_table_from_str(&content)?;
    tracing::debug!(path = %path.display(), zones = table.zones().len(), "zone table loaded");
    Ok(table)
}

/// Parse and validate a zone table from a TOML string
pub fn load_zone_table_from_str(toml_content: &str) -> Result<ZoneTable> {
    toml::from_str(toml_content).map_err(|e| {
        Error::Config(ConfigError::InvalidZoneTable(format!(
            "Failed to parse zone table TOML: {}",
            e
        )))
    })
}
