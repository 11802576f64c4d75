//! Orders and their lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sushi_types::{CartLine, Clp, OrderStatus, PaymentMethod, StoreError};

/// Delivery pricing for one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub fee: Clp,
    pub zone_name: String,
    pub distance_km: f64,
}

/// Priced line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: Clp,
    pub quantity: u32,
    #[serde(default)]
    pub cooking_time_minutes: Option<f64>,
}

impl OrderLine {
    /// Unit price times quantity
    pub fn line_total(&self) -> Clp {
        self.unit_price * Clp::from(self.quantity)
    }

    /// One batch of this line for station load
    pub fn cart_line(&self) -> CartLine {
        CartLine {
            item_id: self.item_id.clone(),
            name: self.name.clone(),
            cooking_time_minutes: self.cooking_time_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Daily-visible ticket number, sequential from 1
    pub number: u32,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub lines: Vec<OrderLine>,
    pub subtotal: Clp,
    pub delivery: FeeQuote,
    pub total: Clp,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub eta_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub ready_at: DateTime<Utc>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Not yet delivered
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Kitchen view of the order: one cart line per order line
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.lines.iter().map(OrderLine::cart_line).collect()
    }

    /// Move to `to`, allowing only the next lifecycle step
    pub fn transition(&mut self, to: OrderStatus, at: DateTime<Utc>) -> Result<(), StoreError> {
        if !self.status.can_transition_to(to) {
            return Err(StoreError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        if to == OrderStatus::Delivered {
            self.delivered_at = Some(at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        let now = Utc::now();
        Order {
            id: "o-1".to_string(),
            number: 1,
            customer_id: None,
            customer_name: "Camila".to_string(),
            phone: None,
            address: None,
            lines: vec![
                OrderLine {
                    item_id: "R1".to_string(),
                    name: "Roll Acevichado".to_string(),
                    unit_price: 6_990,
                    quantity: 2,
                    cooking_time_minutes: Some(12.0),
                },
                OrderLine {
                    item_id: "H1".to_string(),
                    name: "Gyoza frita".to_string(),
                    unit_price: 3_500,
                    quantity: 1,
                    cooking_time_minutes: None,
                },
            ],
            subtotal: 17_480,
            delivery: FeeQuote {
                fee: 0,
                zone_name: "no location".to_string(),
                distance_km: 0.0,
            },
            total: 17_480,
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Pending,
            eta_minutes: 15,
            created_at: now,
            ready_at: now,
            delivered_at: None,
        }
    }

    #[test]
    fn test_line_total() {
        let order = sample_order();
        assert_eq!(order.lines[0].line_total(), 13_980);
    }

    #[test]
    fn test_cart_lines_one_per_line() {
        let order = sample_order();
        let cart = order.cart_lines();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].cooking_time_minutes, Some(12.0));
        assert_eq!(cart[1].cooking_time_minutes, None);
    }

    #[test]
    fn test_transition_forward() {
        let mut order = sample_order();
        let now = Utc::now();
        order.transition(OrderStatus::Cooking, now).unwrap();
        order.transition(OrderStatus::Ready, now).unwrap();
        order.transition(OrderStatus::Delivered, now).unwrap();
        assert_eq!(order.delivered_at, Some(now));
        assert!(!order.is_active());
    }

    #[test]
    fn test_transition_rejects_skip() {
        let mut order = sample_order();
        let err = order.transition(OrderStatus::Delivered, Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
