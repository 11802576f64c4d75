//! Domain model types

pub mod capacity;
pub mod cash_shift;
pub mod customer;
pub mod menu_item;
pub mod order;
pub mod zone;

pub use capacity::{CapacityTable, ShiftCapacity};
pub use cash_shift::{CashMovement, CashShift, MovementKind, ShiftStatus, ShiftSummary};
pub use customer::Customer;
pub use menu_item::MenuItem;
pub use order::{FeeQuote, Order, OrderLine};
pub use zone::{Zone, ZoneTable};
