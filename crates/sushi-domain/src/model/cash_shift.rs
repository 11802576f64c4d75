//! Cashier shift sessions

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sushi_types::{Clp, PaymentMethod, StoreError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Payment for an order
    Sale,
    /// Cash added to the drawer (change float, deposits)
    Income,
    /// Cash taken out (supplies, withdrawals)
    Expense,
}

impl MovementKind {
    /// Lowercase label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::Sale => "sale",
            MovementKind::Income => "income",
            MovementKind::Expense => "expense",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sale" | "venta" => Ok(MovementKind::Sale),
            "income" | "ingreso" => Ok(MovementKind::Income),
            "expense" | "egreso" | "gasto" => Ok(MovementKind::Expense),
            other => Err(format!("unknown movement kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashMovement {
    pub kind: MovementKind,
    /// Always positive; the kind decides the sign
    pub amount: Clp,
    pub method: PaymentMethod,
    #[serde(default)]
    pub description: String,
    /// Order that produced a sale
    #[serde(default)]
    pub order_id: Option<String>,
    pub at: DateTime<Utc>,
}

impl CashMovement {
    /// Validated movement; the amount must be positive
    pub fn new(
        kind: MovementKind,
        amount: Clp,
        method: PaymentMethod,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if amount <= 0 {
            return Err(ValidationError::InvalidAmount(format!(
                "{} amount must be positive, got {}",
                kind, amount
            )));
        }
        Ok(Self {
            kind,
            amount,
            method,
            description: description.into(),
            order_id: None,
            at,
        })
    }

    /// Link the movement to an order
    pub fn for_order(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashShift {
    pub id: String,
    pub opened_at: DateTime<Utc>,
    pub opened_by: String,
    /// Cash in the drawer when the shift started
    pub opening_cash: Clp,
    #[serde(default)]
    pub movements: Vec<CashMovement>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Cash counted by the cashier at close
    #[serde(default)]
    pub counted_cash: Option<Clp>,
    pub status: ShiftStatus,
}

impl CashShift {
    /// New open shift; opening cash cannot be negative
    pub fn open(opened_by: String, opening_cash: Clp, at: DateTime<Utc>) -> Result<Self, ValidationError> {
        if opening_cash < 0 {
            return Err(ValidationError::InvalidAmount(format!(
                "opening cash cannot be negative, got {}",
                opening_cash
            )));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            opened_at: at,
            opened_by,
            opening_cash,
            movements: Vec::new(),
            closed_at: None,
            counted_cash: None,
            status: ShiftStatus::Open,
        })
    }

    /// Whether the shift has not been closed yet
    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }

    /// Append a movement to an open shift
    pub fn record(&mut self, movement: CashMovement) -> Result<(), StoreError> {
        if !self.is_open() {
            return Err(StoreError::Conflict(format!("shift {} is closed", self.id)));
        }
        self.movements.push(movement);
        Ok(())
    }

    /// Close with the counted drawer cash
    pub fn close(&mut self, counted_cash: Clp, at: DateTime<Utc>) -> Result<(), StoreError> {
        if !self.is_open() {
            return Err(StoreError::Conflict(format!("shift {} is already closed", self.id)));
        }
        self.status = ShiftStatus::Closed;
        self.closed_at = Some(at);
        self.counted_cash = Some(counted_cash);
        Ok(())
    }

    /// Totals over all movements
    pub fn summary(&self) -> ShiftSummary {
        ShiftSummary::from_shift(self)
    }
}

/// Totals for a shift
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftSummary {
    pub opening_cash: Clp,
    /// Sales grouped by payment method label
    pub sales_by_method: BTreeMap<String, Clp>,
    pub total_sales: Clp,
    pub sale_count: usize,
    pub total_income: Clp,
    pub total_expense: Clp,
    /// opening + cash sales + income - expense
    pub expected_cash: Clp,
    #[serde(default)]
    pub counted_cash: Option<Clp>,
    /// counted - expected
    #[serde(default)]
    pub difference: Option<Clp>,
}

impl ShiftSummary {
    /// Totals for `shift`
    pub fn from_shift(shift: &CashShift) -> Self {
        let mut sales_by_method: BTreeMap<String, Clp> = BTreeMap::new();
        let mut total_sales = 0;
        let mut sale_count = 0;
        let mut cash_sales = 0;
        let mut total_income = 0;
        let mut total_expense = 0;

        for movement in &shift.movements {
            match movement.kind {
                MovementKind::Sale => {
                    *sales_by_method
                        .entry(movement.method.label().to_string())
                        .or_insert(0) += movement.amount;
                    total_sales += movement.amount;
                    sale_count += 1;
                    if movement.method == PaymentMethod::Cash {
                        cash_sales += movement.amount;
                    }
                }
                MovementKind::Income => total_income += movement.amount,
                MovementKind::Expense => total_expense += movement.amount,
            }
        }

        let expected_cash = shift.opening_cash + cash_sales + total_income - total_expense;

        Self {
            opening_cash: shift.opening_cash,
            sales_by_method,
            total_sales,
            sale_count,
            total_income,
            total_expense,
            expected_cash,
            counted_cash: shift.counted_cash,
            difference: shift.counted_cash.map(|counted| counted - expected_cash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(kind: MovementKind, amount: Clp, method: PaymentMethod) -> CashMovement {
        CashMovement::new(kind, amount, method, "", Utc::now()).unwrap()
    }

    #[test]
    fn test_summary_expected_cash() {
        let mut shift = CashShift::open("Vale".to_string(), 20_000, Utc::now()).unwrap();
        shift.record(movement(MovementKind::Sale, 15_990, PaymentMethod::Cash)).unwrap();
        shift.record(movement(MovementKind::Sale, 12_500, PaymentMethod::Card)).unwrap();
        shift.record(movement(MovementKind::Income, 5_000, PaymentMethod::Cash)).unwrap();
        shift.record(movement(MovementKind::Expense, 3_000, PaymentMethod::Cash)).unwrap();

        let summary = shift.summary();
        assert_eq!(summary.total_sales, 28_490);
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.sales_by_method.get("cash"), Some(&15_990));
        assert_eq!(summary.sales_by_method.get("card"), Some(&12_500));
        assert_eq!(summary.expected_cash, 20_000 + 15_990 + 5_000 - 3_000);
        assert_eq!(summary.difference, None);
    }

    #[test]
    fn test_close_records_difference() {
        let mut shift = CashShift::open("Vale".to_string(), 10_000, Utc::now()).unwrap();
        shift.record(movement(MovementKind::Sale, 8_000, PaymentMethod::Cash)).unwrap();
        shift.close(17_500, Utc::now()).unwrap();

        let summary = shift.summary();
        assert_eq!(summary.expected_cash, 18_000);
        assert_eq!(summary.difference, Some(-500));
    }

    #[test]
    fn test_closed_shift_rejects_movements() {
        let mut shift = CashShift::open("Vale".to_string(), 0, Utc::now()).unwrap();
        shift.close(0, Utc::now()).unwrap();
        assert!(shift.record(movement(MovementKind::Income, 100, PaymentMethod::Cash)).is_err());
        assert!(shift.close(0, Utc::now()).is_err());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert!(CashMovement::new(MovementKind::Sale, 0, PaymentMethod::Cash, "", Utc::now()).is_err());
        assert!(CashMovement::new(MovementKind::Expense, -10, PaymentMethod::Cash, "", Utc::now()).is_err());
        assert!(CashShift::open("x".to_string(), -1, Utc::now()).is_err());
    }

    #[test]
    fn test_movement_kind_parse() {
        assert_eq!("venta".parse::<MovementKind>(), Ok(MovementKind::Sale));
        assert_eq!("Expense".parse::<MovementKind>(), Ok(MovementKind::Expense));
        assert!("refund".parse::<MovementKind>().is_err());
    }
}
