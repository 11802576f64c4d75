//! Shift capacity loader from TOML
//!
//! ```toml
//! [weekday]
//! cold = 2
//! hot = 1
//!
//! [weekend]
//! cold = 3
//! hot = 2
//!
//! [overrides]
//! sat = { cold = 4, hot = 2 }
//! ```

use std::fs;
use std::path::Path;

use sushi_domain::model::CapacityTable;
use sushi_types::{ConfigError, Error, Result};

pub fn load_capacity_table(path: &Path) -> Result<CapacityTable> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(ConfigError::ParseError(format!(
            "Failed to read capacity table {}: {}",
            path.display(),
            e
        )))
    })?;
    load_capacity_table_from_str(&content)
}

pub fn load_capacity_table_from_str(toml_content: &str) -> Result<CapacityTable> {
    toml::from_str(toml_content).map_err(|e| {
        Error::Config(ConfigError::InvalidCapacity(format!(
            "Failed to parse capacity TOML: {}",
            e
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use sushi_domain::model::ShiftCapacity;

    #[test]
    fn test_groups_and_overrides() {
        let toml = r#"
[weekday]
cold = 2
hot = 1

[weekend]
cold = 3
hot = 2

[overrides]
sat = { cold = 4, hot = 2 }
"#;
        let table = load_capacity_table_from_str(toml).unwrap();
        assert_eq!(table.for_weekday(Weekday::Tue), ShiftCapacity::new(2, 1));
        assert_eq!(table.for_weekday(Weekday::Fri), ShiftCapacity::new(3, 2));
        assert_eq!(table.for_weekday(Weekday::Sat), ShiftCapacity::new(4, 2));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let table = load_capacity_table_from_str("").unwrap();
        assert_eq!(table, CapacityTable::default());
    }

    #[test]
    fn test_unknown_day_rejected() {
        let toml = r#"
[overrides]
someday = { cold = 1, hot = 1 }
"#;
        let err = load_capacity_table_from_str(toml).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidCapacity(_))));
    }
}
