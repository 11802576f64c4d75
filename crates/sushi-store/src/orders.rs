//! Order and customer store

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use sushi_domain::model::{Customer, Order};
use sushi_domain::repository::{CustomerRepository, OrderRepository};
use sushi_types::{CartLine, Error, OrderStatus, Result, StoreError};

use crate::load_or_default;

/// Persistent store for orders and customers
pub struct OrderStore {
    orders_path: PathBuf,
    customers_path: PathBuf,
    orders: HashMap<String, Order>,
    customers: HashMap<String, Customer>,
}

impl OrderStore {
    /// Create or load the store in `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let orders_path = store_dir.join("orders.json");
        let customers_path = store_dir.join("customers.json");

        let orders = load_or_default(&orders_path)?;
        let customers = load_or_default(&customers_path)?;

        Ok(Self {
            orders_path,
            customers_path,
            orders,
            customers,
        })
    }

    fn save_orders(&self) -> Result<()> {
        let file = File::create(&self.orders_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.orders)?;
        Ok(())
    }

    fn save_customers(&self) -> Result<()> {
        let file = File::create(&self.customers_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.customers)?;
        Ok(())
    }

    fn next_number(&self) -> u32 {
        self.orders.values().map(|o| o.number).max().unwrap_or(0) + 1
    }

    /// Store a new order; the ticket number is assigned here
    pub fn add_order(&mut self, mut order: Order) -> Result<Order> {
        if self.orders.contains_key(&order.id) {
            return Err(StoreError::Conflict(format!("order {} already exists", order.id)).into());
        }
        order.number = self.next_number();
        self.orders.insert(order.id.clone(), order.clone());
        self.save_orders()?;
        tracing::info!(order = %order.id, number = order.number, total = order.total, "order stored");
        Ok(order)
    }

    /// Order by id
    pub fn get_order(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Order by ticket number
    pub fn get_by_number(&self, number: u32) -> Option<&Order> {
        self.orders.values().find(|o| o.number == number)
    }

    /// All orders, newest first
    pub fn all_orders(&self) -> Vec<&Order> {
        let mut orders: Vec<_> = self.orders.values().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.number.cmp(&a.number)));
        orders
    }

    /// Orders not yet delivered, oldest first
    pub fn active_orders(&self) -> Vec<&Order> {
        let mut orders: Vec<_> = self.orders.values().filter(|o| o.is_active()).collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.number.cmp(&b.number)));
        orders
    }

    /// Kitchen view of the active orders, one cart per order
    pub fn active_queue(&self) -> Vec<Vec<CartLine>> {
        self.active_orders().into_iter().map(Order::cart_lines).collect()
    }

    /// Orders created on a UTC calendar day
    pub fn orders_on(&self, date: NaiveDate) -> Vec<&Order> {
        self.all_orders()
            .into_iter()
            .filter(|o| o.created_at.date_naive() == date)
            .collect()
    }

    /// Advance an order one lifecycle step
    pub fn advance(&mut self, id: &str) -> Result<Order> {
        let current = self
            .orders
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))?
            .status;
        let next = current.next().ok_or_else(|| StoreError::InvalidTransition {
            from: current.to_string(),
            to: "none".to_string(),
        })?;
        self.set_status(id, next)
    }

    /// Set the status; only the next lifecycle step is allowed
    pub fn set_status(&mut self, id: &str, status: OrderStatus) -> Result<Order> {
        let order = self
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))?;
        order.transition(status, Utc::now())?;
        let updated = order.clone();
        self.save_orders()?;
        tracing::info!(order = %updated.id, status = %updated.status, "order status changed");
        Ok(updated)
    }

    /// Number of stored orders
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Insert or replace a customer
    pub fn upsert_customer(&mut self, customer: Customer) -> Result<()> {
        if let Some(existing) = self
            .customers
            .values()
            .find(|c| c.phone == customer.phone && c.id != customer.id)
        {
            return Err(StoreError::Conflict(format!(
                "phone {} already belongs to customer {}",
                customer.phone, existing.id
            ))
            .into());
        }
        self.customers.insert(customer.id.clone(), customer);
        self.save_customers()
    }

    /// Customer by normalized phone
    pub fn customer_by_phone(&self, phone: &str) -> Option<&Customer> {
        self.customers.values().find(|c| c.phone == phone)
    }

    /// Customer by id
    pub fn get_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.get(id)
    }

    /// All customers sorted by name
    pub fn all_customers(&self) -> Vec<&Customer> {
        let mut customers: Vec<_> = self.customers.values().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        customers
    }
}

impl OrderRepository for OrderStore {
    fn save(&mut self, order: Order) -> std::result::Result<Order, Error> {
        self.add_order(order)
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<Order>, Error> {
        Ok(self.orders.get(id).cloned())
    }

    fn find_active(&self) -> std::result::Result<Vec<Order>, Error> {
        Ok(self.active_orders().into_iter().cloned().collect())
    }

    fn update_status(&mut self, id: &str, status: OrderStatus) -> std::result::Result<Order, Error> {
        self.set_status(id, status)
    }
}

impl CustomerRepository for OrderStore {
    fn save(&mut self, customer: Customer) -> std::result::Result<(), Error> {
        self.upsert_customer(customer)
    }

    fn find_by_phone(&self, phone: &str) -> std::result::Result<Option<Customer>, Error> {
        Ok(self.customer_by_phone(phone).cloned())
    }

    fn find_all(&self) -> std::result::Result<Vec<Customer>, Error> {
        Ok(self.all_customers().into_iter().cloned().collect())
    }
}
