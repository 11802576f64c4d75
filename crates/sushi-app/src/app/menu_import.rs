//! Bulk menu import from CSV

use std::path::Path;

use serde::Serialize;
use sushi_domain::repository::MenuRepository;
use sushi_infra::load_menu_csv;
use sushi_types::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}

/// Upsert every row of the CSV into the catalog.
///
/// The whole file is parsed before anything is written, so a bad row leaves the
/// catalog untouched.
pub fn import_menu<R: MenuRepository>(repo: &mut R, csv_path: &Path) -> Result<ImportSummary> {
    let items = load_menu_csv(csv_path)?;
    let mut summary = ImportSummary::default();

    for item in items {
        match repo.find_by_id(&item.id)? {
            Some(existing) if existing == item => summary.unchanged += 1,
            Some(_) => {
                repo.save(item)?;
                summary.updated += 1;
            }
            None => {
                repo.save(item)?;
                summary.inserted += 1;
            }
        }
    }

    tracing::info!(
        path = %csv_path.display(),
        inserted = summary.inserted,
        updated = summary.updated,
        unchanged = summary.unchanged,
        "menu imported"
    );
    Ok(summary)
}
