//! Excel export of cash shift reports

use chrono::{DateTime, Local, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use sushi_types::{Error, Result};

use crate::app::ShiftReport;

fn excel_err(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Export a shift report to an Excel file with Summary and Movements sheets
pub fn export_shift_report(report: &ShiftReport, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, report)?;

    let movements_sheet = workbook.add_worksheet();
    write_movements_sheet(movements_sheet, report)?;

    workbook.save(output_path).map_err(excel_err)?;

    tracing::info!(path = %output_path.display(), shift = %report.shift.id, "shift report exported");
    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, report: &ShiftReport) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format("$#,##0");
    let shift = &report.shift;
    let summary = &report.summary;

    sheet
        .write_string_with_format(0, 0, "Cash Shift Report", &header_format)
        .map_err(excel_err)?;

    sheet.write_string(2, 0, "Opened by:").map_err(excel_err)?;
    sheet.write_string(2, 1, &shift.opened_by).map_err(excel_err)?;

    sheet.write_string(3, 0, "Opened at:").map_err(excel_err)?;
    sheet.write_string(3, 1, local_time(shift.opened_at)).map_err(excel_err)?;

    sheet.write_string(4, 0, "Closed at:").map_err(excel_err)?;
    let closed = shift.closed_at.map(local_time).unwrap_or_else(|| "(open)".to_string());
    sheet.write_string(4, 1, closed).map_err(excel_err)?;

    let totals: [(&str, Option<i64>); 7] = [
        ("Opening cash:", Some(summary.opening_cash)),
        ("Total sales:", Some(summary.total_sales)),
        ("Income:", Some(summary.total_income)),
        ("Expenses:", Some(summary.total_expense)),
        ("Expected cash:", Some(summary.expected_cash)),
        ("Counted cash:", summary.counted_cash),
        ("Difference:", summary.difference),
    ];

    let mut row = 6;
    for (label, value) in totals {
        sheet.write_string(row, 0, label).map_err(excel_err)?;
        if let Some(amount) = value {
            sheet
                .write_number_with_format(row, 1, amount as f64, &money_format)
                .map_err(excel_err)?;
        }
        row += 1;
    }

    row += 1;
    sheet
        .write_string_with_format(row, 0, "Sales by Method", &header_format)
        .map_err(excel_err)?;
    row += 1;
    for (method, amount) in &summary.sales_by_method {
        sheet.write_string(row, 0, method).map_err(excel_err)?;
        sheet
            .write_number_with_format(row, 1, *amount as f64, &money_format)
            .map_err(excel_err)?;
        row += 1;
    }

    sheet.set_column_width(0, 20).map_err(excel_err)?;
    sheet.set_column_width(1, 18).map_err(excel_err)?;

    Ok(())
}

fn write_movements_sheet(sheet: &mut Worksheet, report: &ShiftReport) -> Result<()> {
    sheet.set_name("Movements").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format("$#,##0");

    let headers = ["Time", "Kind", "Method", "Amount", "Description", "Order"];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    for (row_idx, movement) in report.shift.movements.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet.write_string(row, 0, local_time(movement.at)).map_err(excel_err)?;
        sheet.write_string(row, 1, movement.kind.label()).map_err(excel_err)?;
        sheet.write_string(row, 2, movement.method.label()).map_err(excel_err)?;
        sheet
            .write_number_with_format(row, 3, movement.amount as f64, &money_format)
            .map_err(excel_err)?;
        sheet.write_string(row, 4, &movement.description).map_err(excel_err)?;
        if let Some(ref order_id) = movement.order_id {
            sheet.write_string(row, 5, order_id).map_err(excel_err)?;
        }
    }

    sheet.set_column_width(0, 18).map_err(excel_err)?;
    sheet.set_column_width(4, 40).map_err(excel_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sushi_domain::model::{CashMovement, CashShift, MovementKind};
    use sushi_types::PaymentMethod;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_workbook() {
        let now = Utc::now();
        let mut shift = CashShift::open("Vale".to_string(), 10_000, now).unwrap();
        shift
            .record(CashMovement::new(MovementKind::Sale, 12_990, PaymentMethod::Card, "Pedido #1", now).unwrap())
            .unwrap();
        shift.close(10_000, now).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("turno.xlsx");
        export_shift_report(&ShiftReport::from(shift), &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
