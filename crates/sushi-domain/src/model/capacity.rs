//! Kitchen station capacity per shift

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use sushi_types::{ConfigError, Station};

/// Number of simultaneously staffed stations of each type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCapacity {
    pub cold: u32,
    pub hot: u32,
}

impl ShiftCapacity {
    pub const fn new(cold: u32, hot: u32) -> Self {
        Self { cold, hot }
    }

    /// Staffed count for `station`
    pub fn for_station(&self, station: Station) -> u32 {
        match station {
            Station::Cold => self.cold,
            Station::Hot => self.hot,
        }
    }
}

impl Default for ShiftCapacity {
    fn default() -> Self {
        Self::new(2, 1)
    }
}

/// Weekday to capacity map
///
/// Mon-Thu use `weekday`, Fri-Sun use `weekend`; a per-day override wins over both.
/// Both groups currently default to the same 2 cold / 1 hot staffing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityTable {
    pub weekday: ShiftCapacity,
    pub weekend: ShiftCapacity,
    /// Keyed by chrono's short weekday name ("Mon", "Fri")
    pub overrides: BTreeMap<String, ShiftCapacity>,
}

impl CapacityTable {
    /// Same capacity every day
    pub fn uniform(capacity: ShiftCapacity) -> Self {
        Self {
            weekday: capacity,
            weekend: capacity,
            overrides: BTreeMap::new(),
        }
    }

    /// Capacity for one specific weekday
    pub fn with_override(mut self, day: Weekday, capacity: ShiftCapacity) -> Self {
        self.overrides.insert(day.to_string(), capacity);
        self
    }

    /// Capacity for a weekday, override first
    pub fn for_weekday(&self, day: Weekday) -> ShiftCapacity {
        if let Some(capacity) = self.overrides.get(&day.to_string()) {
            return *capacity;
        }
        match day {
            Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => self.weekday,
            Weekday::Fri | Weekday::Sat | Weekday::Sun => self.weekend,
        }
    }

    /// Capacity for the weekday of `date`
    pub fn for_date<D: Datelike>(&self, date: &D) -> ShiftCapacity {
        self.for_weekday(date.weekday())
    }
}

impl Default for CapacityTable {
    fn default() -> Self {
        Self::uniform(ShiftCapacity::default())
    }
}

impl<'de> Deserialize<'de> for CapacityTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            weekday: ShiftCapacity,
            #[serde(default)]
            weekend: ShiftCapacity,
            #[serde(default)]
            overrides: BTreeMap<String, ShiftCapacity>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let mut overrides = BTreeMap::new();
        for (key, capacity) in raw.overrides {
            let day: Weekday = key.parse().map_err(|_| {
                serde::de::Error::custom(ConfigError::InvalidCapacity(format!(
                    "unknown weekday '{}'",
                    key
                )))
            })?;
            overrides.insert(day.to_string(), capacity);
        }

        Ok(Self {
            weekday: raw.weekday,
            weekend: raw.weekend,
            overrides,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_is_two_cold_one_hot_every_day() {
        let table = CapacityTable::default();
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(table.for_weekday(day), ShiftCapacity::new(2, 1));
        }
    }

    #[test]
    fn test_weekend_group() {
        let table = CapacityTable {
            weekday: ShiftCapacity::new(2, 1),
            weekend: ShiftCapacity::new(3, 2),
            overrides: BTreeMap::new(),
        };
        assert_eq!(table.for_weekday(Weekday::Thu), ShiftCapacity::new(2, 1));
        assert_eq!(table.for_weekday(Weekday::Fri), ShiftCapacity::new(3, 2));
        assert_eq!(table.for_weekday(Weekday::Sun), ShiftCapacity::new(3, 2));
    }

    #[test]
    fn test_override_wins() {
        let table = CapacityTable::default().with_override(Weekday::Sat, ShiftCapacity::new(4, 3));
        assert_eq!(table.for_weekday(Weekday::Sat), ShiftCapacity::new(4, 3));
        assert_eq!(table.for_weekday(Weekday::Fri), ShiftCapacity::new(2, 1));
    }

    #[test]
    fn test_for_date() {
        // 2024-03-15 is a Friday
        let table = CapacityTable::default().with_override(Weekday::Fri, ShiftCapacity::new(5, 5));
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(table.for_date(&date), ShiftCapacity::new(5, 5));
    }

    #[test]
    fn test_deserialize_normalizes_day_names() {
        let json = r#"{"weekday":{"cold":2,"hot":1},"overrides":{"friday":{"cold":3,"hot":2}}}"#;
        let table: CapacityTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.for_weekday(Weekday::Fri), ShiftCapacity::new(3, 2));
        assert_eq!(table.weekend, ShiftCapacity::new(2, 1));
    }

    #[test]
    fn test_deserialize_rejects_unknown_day() {
        let json = r#"{"overrides":{"funday":{"cold":3,"hot":2}}}"#;
        assert!(serde_json::from_str::<CapacityTable>(json).is_err());
    }
}
