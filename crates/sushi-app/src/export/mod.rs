//! Report export

pub mod excel;

pub use excel::export_shift_report;
