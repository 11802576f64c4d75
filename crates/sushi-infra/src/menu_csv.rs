//! CSV import for the menu catalog
//!
//! Expected header (last three columns optional):
//! id,name,category,price,cooking_time_minutes,station,available

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sushi_domain::model::MenuItem;
use sushi_types::{Clp, Station};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuCsvError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in row {row}, column {column}: {value}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Empty required value in row {row}, column {column}")]
    EmptyValue { row: usize, column: String },
}

impl From<MenuCsvError> for sushi_types::Error {
    fn from(err: MenuCsvError) -> Self {
        match err {
            MenuCsvError::IoError(e) => sushi_types::Error::Io(e),
            MenuCsvError::CsvError(e) => sushi_types::Error::Csv(e),
            other => sushi_types::Error::Import(other.to_string()),
        }
    }
}

const REQUIRED: [&str; 4] = ["id", "name", "category", "price"];

/// Column positions resolved from the header row
struct Columns {
    id: usize,
    name: usize,
    category: usize,
    price: usize,
    cooking_time: Option<usize>,
    station: Option<usize>,
    available: Option<usize>,
}

/// Load menu items from a UTF-8 CSV file
pub fn load_menu_csv<P: AsRef<Path>>(path: P) -> Result<Vec<MenuItem>, MenuCsvError> {
    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    parse_menu_csv(&content)
}

pub fn parse_menu_csv(content: &str) -> Result<Vec<MenuItem>, MenuCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut items = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        // +2: 0-based index plus header row
        let row_num = row_idx + 2;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        items.push(parse_record(&record, &columns, row_num)?);
    }

    tracing::debug!(items = items.len(), "menu CSV parsed");
    Ok(items)
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, MenuCsvError> {
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    for col in REQUIRED {
        if find(col).is_none() {
            return Err(MenuCsvError::MissingColumn(col.to_string()));
        }
    }

    let required = |name: &str| find(name).ok_or_else(|| MenuCsvError::MissingColumn(name.to_string()));

    Ok(Columns {
        id: required("id")?,
        name: required("name")?,
        category: required("category")?,
        price: required("price")?,
        cooking_time: find("cooking_time_minutes"),
        station: find("station"),
        available: find("available"),
    })
}

fn parse_record(record: &csv::StringRecord, columns: &Columns, row: usize) -> Result<MenuItem, MenuCsvError> {
    let required = |idx: usize, column: &str| -> Result<String, MenuCsvError> {
        let value = record.get(idx).unwrap_or("");
        if value.is_empty() {
            Err(MenuCsvError::EmptyValue {
                row,
                column: column.to_string(),
            })
        } else {
            Ok(value.to_string())
        }
    };
    let optional = |idx: Option<usize>| idx.and_then(|i| record.get(i)).filter(|v| !v.is_empty());

    let id = required(columns.id, "id")?;
    let name = required(columns.name, "name")?;
    let category = required(columns.category, "category")?;
    let price_str = required(columns.price, "price")?;
    let price = parse_price(&price_str).ok_or_else(|| MenuCsvError::InvalidValue {
        row,
        column: "price".to_string(),
        value: price_str.clone(),
    })?;

    let cooking_time_minutes = match optional(columns.cooking_time) {
        Some(v) => Some(v.parse::<f64>().map_err(|_| MenuCsvError::InvalidValue {
            row,
            column: "cooking_time_minutes".to_string(),
            value: v.to_string(),
        })?),
        None => None,
    };

    let station = match optional(columns.station) {
        Some(v) => Some(v.parse::<Station>().map_err(|_| MenuCsvError::InvalidValue {
            row,
            column: "station".to_string(),
            value: v.to_string(),
        })?),
        None => None,
    };

    let available = match optional(columns.available) {
        Some(v) => parse_bool(v).ok_or_else(|| MenuCsvError::InvalidValue {
            row,
            column: "available".to_string(),
            value: v.to_string(),
        })?,
        None => true,
    };

    Ok(MenuItem {
        id,
        name,
        category,
        price,
        cooking_time_minutes,
        station,
        available,
        description: None,
    })
}

/// Accepts "6990", "6.990" and "$6.990"
fn parse_price(s: &str) -> Option<Clp> {
    let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | '.' | ' ')).collect();
    let price: Clp = cleaned.parse().ok()?;
    if price < 0 {
        None
    } else {
        Some(price)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "si" | "sí" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CSV: &str = "\
id,name,category,price,cooking_time_minutes,station,available
R1,Roll Acevichado,Rolls,6990,12,,
H1,Gyoza frita,Entradas,$3.500,8,hot,true
P1,Promo 40 piezas,Promos,19.990,,cold,no
";

    #[test]
    fn test_parse_full() {
        let items = parse_menu_csv(TEST_CSV).unwrap();
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].id, "R1");
        assert_eq!(items[0].price, 6_990);
        assert_eq!(items[0].cooking_time_minutes, Some(12.0));
        assert_eq!(items[0].station, None);
        assert!(items[0].available);

        assert_eq!(items[1].price, 3_500);
        assert_eq!(items[1].station, Some(Station::Hot));

        assert_eq!(items[2].price, 19_990);
        assert_eq!(items[2].cooking_time_minutes, None);
        assert!(!items[2].available);
    }

    #[test]
    fn test_optional_columns_absent() {
        let csv = "id,name,category,price\nS1,Sashimi,Sashimi,7900\n";
        let items = parse_menu_csv(csv).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].available);
        assert_eq!(items[0].station, None);
    }

    #[test]
    fn test_missing_column() {
        let csv = "id,name,price\nS1,Sashimi,7900\n";
        let err = parse_menu_csv(csv).unwrap_err();
        assert!(matches!(err, MenuCsvError::MissingColumn(ref c) if c == "category"));
    }

    #[test]
    fn test_invalid_price_reports_row() {
        let csv = "id,name,category,price\nS1,Sashimi,Sashimi,gratis\n";
        let err = parse_menu_csv(csv).unwrap_err();
        assert!(matches!(err, MenuCsvError::InvalidValue { row: 2, .. }));
    }

    #[test]
    fn test_empty_required_value() {
        let csv = "id,name,category,price\n,Sashimi,Sashimi,7900\n";
        let err = parse_menu_csv(csv).unwrap_err();
        assert!(matches!(err, MenuCsvError::EmptyValue { row: 2, .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.csv");
        std::fs::write(&path, TEST_CSV).unwrap();
        assert_eq!(load_menu_csv(&path).unwrap().len(), 3);
    }
}
