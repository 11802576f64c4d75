//! Cash shift workflow: open, record, close and report

use chrono::{DateTime, Utc};
use serde::Serialize;
use sushi_domain::model::{CashMovement, CashShift, MovementKind, Order, ShiftSummary};
use sushi_domain::repository::CashShiftRepository;
use sushi_types::{Clp, Result, StoreError};

/// A shift together with its computed totals
#[derive(Debug, Clone, Serialize)]
pub struct ShiftReport {
    pub shift: CashShift,
    pub summary: ShiftSummary,
}

impl From<CashShift> for ShiftReport {
    fn from(shift: CashShift) -> Self {
        let summary = shift.summary();
        Self { shift, summary }
    }
}

fn require_open<R: CashShiftRepository>(repo: &R) -> Result<CashShift> {
    repo.find_open()?
        .ok_or_else(|| StoreError::NotFound("no open shift".to_string()).into())
}

/// Start a shift; fails while another one is open
pub fn open_shift<R: CashShiftRepository>(
    repo: &mut R,
    opened_by: &str,
    opening_cash: Clp,
    at: DateTime<Utc>,
) -> Result<CashShift> {
    if let Some(open) = repo.find_open()? {
        return Err(StoreError::Conflict(format!(
            "shift opened by {} at {} is still open",
            open.opened_by,
            open.opened_at.format("%Y-%m-%d %H:%M")
        ))
        .into());
    }
    let shift = CashShift::open(opened_by.to_string(), opening_cash, at)?;
    repo.save(shift.clone())?;
    tracing::info!(shift = %shift.id, opened_by, opening_cash, "cash shift opened");
    Ok(shift)
}

/// Append a movement to the open shift
pub fn record_movement<R: CashShiftRepository>(repo: &mut R, movement: CashMovement) -> Result<CashShift> {
    let mut shift = require_open(repo)?;
    tracing::debug!(kind = %movement.kind, amount = movement.amount, "cash movement recorded");
    shift.record(movement)?;
    repo.save(shift.clone())?;
    Ok(shift)
}

/// Record the sale of an order in the open shift; free orders leave the drawer untouched
pub fn record_order_sale<R: CashShiftRepository>(repo: &mut R, order: &Order, at: DateTime<Utc>) -> Result<CashShift> {
    if order.total <= 0 {
        tracing::debug!(number = order.number, total = order.total, "free order, no sale recorded");
        return require_open(repo);
    }
    let movement = CashMovement::new(
        MovementKind::Sale,
        order.total,
        order.payment_method,
        format!("Pedido #{}", order.number),
        at,
    )?
    .for_order(&order.id);
    record_movement(repo, movement)
}

/// Close the open shift with the counted drawer cash
pub fn close_shift<R: CashShiftRepository>(repo: &mut R, counted_cash: Clp, at: DateTime<Utc>) -> Result<ShiftReport> {
    let mut shift = require_open(repo)?;
    shift.close(counted_cash, at)?;
    repo.save(shift.clone())?;

    let report = ShiftReport::from(shift);
    tracing::info!(
        shift = %report.shift.id,
        expected = report.summary.expected_cash,
        counted = counted_cash,
        difference = report.summary.difference.unwrap_or(0),
        "cash shift closed"
    );
    Ok(report)
}

/// Report for a shift by id, or for the open shift, or the most recent one
pub fn shift_report<R: CashShiftRepository>(repo: &R, shift_id: Option<&str>) -> Result<ShiftReport> {
    let shift = match shift_id {
        Some("") => return Err(StoreError::NotFound("empty shift id".to_string()).into()),
        Some(id) => repo
            .find_all()?
            .into_iter()
            .find(|s| s.id == id || s.id.starts_with(id))
            .ok_or_else(|| StoreError::NotFound(format!("shift {}", id)))?,
        None => match repo.find_open()? {
            Some(open) => open,
            None => repo
                .find_all()?
                .into_iter()
                .max_by_key(|s| s.opened_at)
                .ok_or_else(|| StoreError::NotFound("no shifts recorded".to_string()))?,
        },
    };
    Ok(ShiftReport::from(shift))
}
