//! Order Service - quoting and creating delivery orders
//!
//! A quote resolves the requested items against the catalog, prices the
//! delivery with the zone table and estimates the kitchen ETA from the
//! orders still in the queue. Creating an order persists exactly what was
//! quoted.

use std::str::FromStr;

use chrono::{DateTime, Duration, Local, Utc};
use serde::Serialize;
use sushi_domain::model::{CapacityTable, Customer, FeeQuote, MenuItem, Order, OrderLine};
use sushi_domain::repository::{CustomerRepository, MenuRepository, OrderRepository};
use sushi_domain::service::{
    normalize_phone, EtaEstimate, GeoZoneFeeCalculator, StationClassifier, StationLoadEstimator,
};
use sushi_types::{CartLine, Clp, Coordinate, OrderStatus, PaymentMethod, Result, ValidationError};

use crate::config::Config;

/// Name used when the order has no customer attached
pub const WALK_IN_CUSTOMER: &str = "Mostrador";

/// One requested menu item and how many of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedItem {
    pub item_id: String,
    pub quantity: u32,
}

impl RequestedItem {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Parses `ID` or `ID:QTY`
impl FromStr for RequestedItem {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (id, quantity) = match s.rsplit_once(':') {
            Some((id, qty)) => {
                let quantity = qty
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ValidationError::InvalidAmount(format!("invalid quantity in '{}'", s)))?;
                (id.trim(), quantity)
            }
            None => (s.trim(), 1),
        };
        if id.is_empty() {
            return Err(ValidationError::UnknownMenuItem(s.to_string()));
        }
        Ok(Self::new(id, quantity))
    }
}

/// What the caller asks for
#[derive(Debug, Clone, Default)]
pub struct OrderRequest {
    pub items: Vec<RequestedItem>,
    /// Delivery point; falls back to the customer's saved location
    pub destination: Option<Coordinate>,
    pub customer_phone: Option<String>,
    pub customer_name: Option<String>,
    pub address: Option<String>,
    pub payment_method: PaymentMethod,
    /// Customer collects at the counter; no delivery fee
    pub pickup: bool,
}

/// Priced order ready to be confirmed
#[derive(Debug, Clone, Serialize)]
pub struct OrderQuote {
    pub lines: Vec<OrderLine>,
    pub subtotal: Clp,
    pub delivery: FeeQuote,
    pub total: Clp,
    pub eta: EtaEstimate,
    pub ready_at: DateTime<Utc>,
    pub customer: Option<Customer>,
    #[serde(skip)]
    phone: Option<String>,
    #[serde(skip)]
    destination: Option<Coordinate>,
}

impl OrderQuote {
    pub fn eta_minutes(&self) -> u32 {
        self.eta.minutes
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }
}

/// Order workflow over the catalog and the order queue
#[derive(Debug, Clone)]
pub struct OrderService {
    fee_calculator: GeoZoneFeeCalculator,
    capacity: CapacityTable,
}

impl OrderService {
    pub fn new(fee_calculator: GeoZoneFeeCalculator, capacity: CapacityTable) -> Self {
        Self {
            fee_calculator,
            capacity,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.fee_calculator()?, config.capacity_table()?))
    }

    pub fn fee_calculator(&self) -> &GeoZoneFeeCalculator {
        &self.fee_calculator
    }

    /// Price a request without persisting anything
    pub fn quote<M, O>(&self, menu: &M, orders: &O, request: &OrderRequest, now: DateTime<Local>) -> Result<OrderQuote>
    where
        M: MenuRepository,
        O: OrderRepository + CustomerRepository,
    {
        let catalog = menu.find_all()?;
        let lines = resolve_lines(&catalog, &request.items)?;
        let subtotal: Clp = lines.iter().map(OrderLine::line_total).sum();

        let phone = request
            .customer_phone
            .as_deref()
            .map(normalize_phone)
            .transpose()?;
        let customer = match phone {
            Some(ref phone) => orders.find_by_phone(phone)?,
            None => None,
        };

        let destination = if request.pickup {
            None
        } else {
            request
                .destination
                .or_else(|| customer.as_ref().and_then(|c| c.location))
        };
        let delivery = self.fee_calculator.compute_fee(destination.as_ref());

        let queue: Vec<Vec<CartLine>> = orders.find_active()?.iter().map(Order::cart_lines).collect();
        let cart: Vec<CartLine> = lines.iter().map(OrderLine::cart_line).collect();
        let estimator = StationLoadEstimator::new(StationClassifier::from_menu(&catalog), self.capacity.clone());
        let eta = estimator.estimate(&queue, &cart, &now);

        let ready_at = now.with_timezone(&Utc) + Duration::minutes(i64::from(eta.minutes));
        let total = subtotal + delivery.fee;

        tracing::debug!(
            subtotal,
            fee = delivery.fee,
            zone = %delivery.zone_name,
            eta = eta.minutes,
            queued = queue.len(),
            "order quoted"
        );

        Ok(OrderQuote {
            lines,
            subtotal,
            delivery,
            total,
            eta,
            ready_at,
            customer,
            phone,
            destination,
        })
    }

    /// Quote and persist a pending order
    pub fn create<M, O>(&self, menu: &M, orders: &mut O, request: &OrderRequest, now: DateTime<Local>) -> Result<Order>
    where
        M: MenuRepository,
        O: OrderRepository + CustomerRepository,
    {
        let quote = self.quote(menu, orders, request, now)?;

        let customer_name = request
            .customer_name
            .clone()
            .or_else(|| quote.customer.as_ref().map(|c| c.name.clone()))
            .unwrap_or_else(|| WALK_IN_CUSTOMER.to_string());
        let address = if request.pickup {
            None
        } else {
            request
                .address
                .clone()
                .or_else(|| quote.customer.as_ref().and_then(|c| c.address.clone()))
        };

        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            number: 0,
            customer_id: quote.customer.as_ref().map(|c| c.id.clone()),
            customer_name,
            phone: quote.phone.clone(),
            address,
            lines: quote.lines,
            subtotal: quote.subtotal,
            delivery: quote.delivery,
            total: quote.total,
            payment_method: request.payment_method,
            status: OrderStatus::Pending,
            eta_minutes: quote.eta.minutes,
            created_at: now.with_timezone(&Utc),
            ready_at: quote.ready_at,
            delivered_at: None,
        };

        let order = OrderRepository::save(orders, order)?;
        tracing::info!(
            number = order.number,
            total = order.total,
            eta = order.eta_minutes,
            "order created"
        );
        Ok(order)
    }
}

/// Merge duplicate ids, then price each line from the catalog
fn resolve_lines(catalog: &[MenuItem], items: &[RequestedItem]) -> Result<Vec<OrderLine>> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCart.into());
    }

    let mut merged: Vec<RequestedItem> = Vec::new();
    for req in items {
        if req.quantity == 0 {
            return Err(ValidationError::InvalidAmount(format!("quantity for {} must be at least 1", req.item_id)).into());
        }
        match merged.iter_mut().find(|m| m.item_id == req.item_id) {
            Some(existing) => existing.quantity += req.quantity,
            None => merged.push(req.clone()),
        }
    }

    merged
        .into_iter()
        .map(|req| {
            let item = catalog
                .iter()
                .find(|i| i.id == req.item_id)
                .ok_or_else(|| ValidationError::UnknownMenuItem(req.item_id.clone()))?;
            if !item.available {
                return Err(ValidationError::UnavailableMenuItem(item.name.clone()).into());
            }
            Ok(OrderLine {
                item_id: item.id.clone(),
                name: item.name.clone(),
                unit_price: item.price,
                quantity: req.quantity,
                cooking_time_minutes: item.cooking_time_minutes,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<MenuItem> {
        let mut off = MenuItem::new("OFF", "Roll de temporada", "Rolls", 7_500);
        off.available = false;
        vec![
            MenuItem::new("R1", "Roll Acevichado", "Rolls", 6_990).with_cooking_time(10.0),
            MenuItem::new("H1", "Gyoza frita", "Entradas", 3_500).with_cooking_time(8.0),
            off,
        ]
    }

    #[test]
    fn test_requested_item_parse() {
        assert_eq!("R1".parse::<RequestedItem>().unwrap(), RequestedItem::new("R1", 1));
        assert_eq!("R1:3".parse::<RequestedItem>().unwrap(), RequestedItem::new("R1", 3));
        assert!("R1:x".parse::<RequestedItem>().is_err());
        assert!(":2".parse::<RequestedItem>().is_err());
    }

    #[test]
    fn test_resolve_merges_duplicates() {
        let lines = resolve_lines(
            &catalog(),
            &[RequestedItem::new("R1", 1), RequestedItem::new("H1", 2), RequestedItem::new("R1", 2)],
        )
        .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_id, "R1");
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].line_total(), 20_970);
    }

    #[test]
    fn test_resolve_rejects_bad_requests() {
        let items = catalog();
        assert!(matches!(
            resolve_lines(&items, &[]),
            Err(sushi_types::Error::Validation(ValidationError::EmptyCart))
        ));
        assert!(matches!(
            resolve_lines(&items, &[RequestedItem::new("R1", 0)]),
            Err(sushi_types::Error::Validation(ValidationError::InvalidAmount(_)))
        ));
        assert!(matches!(
            resolve_lines(&items, &[RequestedItem::new("NOPE", 1)]),
            Err(sushi_types::Error::Validation(ValidationError::UnknownMenuItem(_)))
        ));
        assert!(matches!(
            resolve_lines(&items, &[RequestedItem::new("OFF", 1)]),
            Err(sushi_types::Error::Validation(ValidationError::UnavailableMenuItem(_)))
        ));
    }
}
