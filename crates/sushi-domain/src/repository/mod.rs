//! Repository trait definitions for data persistence

use crate::model::{CashShift, Customer, MenuItem, Order};
use sushi_types::{Error, OrderStatus};

/// Repository for the menu catalog
pub trait MenuRepository {
    /// Insert or replace an item by id
    fn save(&mut self, item: MenuItem) -> Result<(), Error>;

    /// Remove an item, returning whether it existed
    fn remove(&mut self, id: &str) -> Result<bool, Error>;

    fn find_by_id(&self, id: &str) -> Result<Option<MenuItem>, Error>;

    fn find_all(&self) -> Result<Vec<MenuItem>, Error>;
}

/// Repository for orders
pub trait OrderRepository {
    /// Persist a new order, assigning its ticket number
    fn save(&mut self, order: Order) -> Result<Order, Error>;

    fn find_by_id(&self, id: &str) -> Result<Option<Order>, Error>;

    /// Orders not yet delivered, oldest first
    fn find_active(&self) -> Result<Vec<Order>, Error>;

    fn update_status(&mut self, id: &str, status: OrderStatus) -> Result<Order, Error>;
}

/// Repository for customers
pub trait CustomerRepository {
    fn save(&mut self, customer: Customer) -> Result<(), Error>;

    /// Find by normalized phone
    fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, Error>;

    fn find_all(&self) -> Result<Vec<Customer>, Error>;
}

/// Repository for cash shifts
pub trait CashShiftRepository {
    fn save(&mut self, shift: CashShift) -> Result<(), Error>;

    fn find_open(&self) -> Result<Option<CashShift>, Error>;

    fn find_all(&self) -> Result<Vec<CashShift>, Error>;
}
