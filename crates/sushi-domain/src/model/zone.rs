//! Delivery zone table

use serde::{Deserialize, Serialize};
use sushi_types::{Clp, ConfigError};

/// Fee tier keyed by maximum distance from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    /// Upper bound in km; `None` means unbounded (catch-all)
    #[serde(default)]
    pub radius_km: Option<f64>,
    pub fee: Clp,
}

impl Zone {
    /// Zone reaching up to `radius_km`
    pub fn bounded(name: impl Into<String>, radius_km: f64, fee: Clp) -> Self {
        Self {
            name: name.into(),
            radius_km: Some(radius_km),
            fee,
        }
    }

    /// Unbounded last zone
    pub fn catch_all(name: impl Into<String>, fee: Clp) -> Self {
        Self {
            name: name.into(),
            radius_km: None,
            fee,
        }
    }

    /// Whether `distance_km` falls inside this zone
    pub fn covers(&self, distance_km: f64) -> bool {
        match self.radius_km {
            Some(radius) => radius >= distance_km,
            None => true,
        }
    }
}

/// Ordered zone sequence with strictly increasing radii and a catch-all last entry
///
/// Construction validates the ordering, so lookups always find a zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneTable {
    zones: Vec<Zone>,
}

impl ZoneTable {
    /// Validated table; see [`ConfigError::InvalidZoneTable`]
    pub fn new(zones: Vec<Zone>) -> Result<Self, ConfigError> {
        let Some((last, bounded)) = zones.split_last() else {
            return Err(ConfigError::InvalidZoneTable("no zones defined".to_string()));
        };

        if last.radius_km.is_some() {
            return Err(ConfigError::InvalidZoneTable(format!(
                "last zone '{}' must have an unbounded radius",
                last.name
            )));
        }

        let mut previous: Option<f64> = None;
        for zone in bounded {
            let radius = zone.radius_km.ok_or_else(|| {
                ConfigError::InvalidZoneTable(format!(
                    "only the last zone may be unbounded, found '{}'",
                    zone.name
                ))
            })?;
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ConfigError::InvalidZoneTable(format!(
                    "zone '{}' has invalid radius {}",
                    zone.name, radius
                )));
            }
            if let Some(prev) = previous {
                if radius <= prev {
                    return Err(ConfigError::InvalidZoneTable(format!(
                        "zone '{}' radius {} km is not greater than {} km",
                        zone.name, radius, prev
                    )));
                }
            }
            previous = Some(radius);
        }

        Ok(Self { zones })
    }

    /// First zone whose radius covers the distance
    pub fn lookup(&self, distance_km: f64) -> &Zone {
        self.zones
            .iter()
            .find(|z| z.covers(distance_km))
            .unwrap_or_else(|| self.catch_all())
    }

    /// The unbounded last zone
    pub fn catch_all(&self) -> &Zone {
        // non-empty by construction
        &self.zones[self.zones.len() - 1]
    }

    /// Zones in ascending radius order
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self {
            zones: vec![
                Zone::bounded("Zona 1", 3.0, 1_500),
                Zone::bounded("Zona 2", 6.0, 2_500),
                Zone::bounded("Zona 3", 10.0, 3_500),
                Zone::catch_all("Zona extendida", 5_000),
            ],
        }
    }
}

impl<'de> Deserialize<'de> for ZoneTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            zones: Vec<Zone>,
        }
        let raw = Raw::deserialize(deserializer)?;
        ZoneTable::new(raw.zones).map_err(serde::de::Error::custom)
    }
}
