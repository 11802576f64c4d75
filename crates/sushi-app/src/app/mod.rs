//! Application use cases

pub mod menu_import;
pub mod order_service;
pub mod shift_service;

pub use menu_import::{import_menu, ImportSummary};
pub use order_service::{OrderQuote, OrderRequest, OrderService, RequestedItem, WALK_IN_CUSTOMER};
pub use shift_service::{
    close_shift, open_shift, record_movement, record_order_sale, shift_report, ShiftReport,
};
