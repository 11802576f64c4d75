//! Cash shift store

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use sushi_domain::model::CashShift;
use sushi_domain::repository::CashShiftRepository;
use sushi_types::{Error, Result, StoreError};

use crate::load_or_default;

/// Persistent store for cashier shifts; at most one shift is open at a time
pub struct ShiftStore {
    store_path: PathBuf,
    shifts: HashMap<String, CashShift>,
}

impl ShiftStore {
    /// Create or load `shifts.json` in `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("shifts.json");
        let shifts = load_or_default(&store_path)?;
        Ok(Self { store_path, shifts })
    }

    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.shifts)?;
        Ok(())
    }

    /// The open shift, if any
    pub fn current(&self) -> Option<&CashShift> {
        self.shifts.values().find(|s| s.is_open())
    }

    /// Shift by exact id
    pub fn get(&self, id: &str) -> Option<&CashShift> {
        self.shifts.get(id)
    }

    /// All shifts, most recent first
    pub fn history(&self) -> Vec<&CashShift> {
        let mut shifts: Vec<_> = self.shifts.values().collect();
        shifts.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
        shifts
    }

    /// Number of recorded shifts
    pub fn count(&self) -> usize {
        self.shifts.len()
    }
}

impl CashShiftRepository for ShiftStore {
    fn save(&mut self, shift: CashShift) -> std::result::Result<(), Error> {
        if shift.is_open() {
            if let Some(open) = self.current() {
                if open.id != shift.id {
                    return Err(StoreError::Conflict(format!("shift {} is already open", open.id)).into());
                }
            }
        }
        tracing::debug!(shift = %shift.id, status = ?shift.status, "cash shift saved");
        self.shifts.insert(shift.id.clone(), shift);
        self.persist()
    }

    fn find_open(&self) -> std::result::Result<Option<CashShift>, Error> {
        Ok(self.current().cloned())
    }

    fn find_all(&self) -> std::result::Result<Vec<CashShift>, Error> {
        Ok(self.history().into_iter().cloned().collect())
    }
}
