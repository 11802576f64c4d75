//! Configuration management for sushi-desk
//!
//! Config stored at: ~/.config/sushi-desk/config.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sushi_domain::model::{CapacityTable, ZoneTable};
use sushi_domain::service::{format_clp, GeoZoneFeeCalculator};
use sushi_infra::{load_capacity_table, load_zone_table};
use sushi_types::{Clp, ConfigError, Coordinate, OutputFormat, Result};

/// Santiago centre, used until the store location is configured
pub const DEFAULT_ORIGIN: Coordinate = Coordinate {
    latitude: -33.4489,
    longitude: -70.6693,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory override
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Store location that delivery distances are measured from
    #[serde(default = "default_origin")]
    pub origin: Coordinate,

    /// Optional TOML zone table; built-in tiers when absent
    #[serde(default)]
    pub zones_path: Option<PathBuf>,

    /// Optional TOML shift capacity map; 2 cold / 1 hot when absent
    #[serde(default)]
    pub capacity_path: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_origin() -> Coordinate {
    DEFAULT_ORIGIN
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: None,
            origin: default_origin(),
            zones_path: None,
            capacity_path: None,
            output_format: OutputFormat::default(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("sushi-desk");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory holding menu, order and shift files
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("sushi-desk");
        Ok(data_dir)
    }

    /// Load config from the default location, or defaults when missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }

    pub fn zone_table(&self) -> Result<ZoneTable> {
        match self.zones_path {
            Some(ref path) => load_zone_table(path),
            None => Ok(ZoneTable::default()),
        }
    }

    pub fn capacity_table(&self) -> Result<CapacityTable> {
        match self.capacity_path {
            Some(ref path) => load_capacity_table(path),
            None => Ok(CapacityTable::default()),
        }
    }

    pub fn fee_calculator(&self) -> Result<GeoZoneFeeCalculator> {
        Ok(GeoZoneFeeCalculator::new(self.origin, self.zone_table()?))
    }

    /// Format an amount with the configured currency symbol
    pub fn format_amount(&self, amount: Clp) -> String {
        let formatted = format_clp(amount);
        if self.currency_symbol == "$" {
            formatted
        } else {
            formatted.replacen('$', &self.currency_symbol, 1)
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sushi Desk Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Store dir:      {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Origin:         {}", self.origin)?;
        writeln!(
            f,
            "Zone table:     {}",
            self.zones_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string())
        )?;
        writeln!(
            f,
            "Capacity map:   {}",
            self.capacity_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(2 cold / 1 hot)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(f, "Currency:       {}", self.currency_symbol)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
