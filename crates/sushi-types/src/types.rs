//! Core value types shared across the workspace

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Amount in Chilean pesos. CLP has no minor unit.
pub type Clp = i64;

/// Cooking minutes assumed when a line does not declare one
pub const DEFAULT_COOKING_MINUTES: f64 = 15.0;

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Kitchen preparation line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Station {
    /// Rolls, nigiri, sashimi
    Cold,
    /// Fryer and wok
    Hot,
}

impl Station {
    pub fn label(&self) -> &'static str {
        match self {
            Station::Cold => "cold",
            Station::Hot => "hot",
        }
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Station {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cold" | "frio" | "fría" | "fria" | "frío" => Ok(Station::Cold),
            "hot" | "caliente" => Ok(Station::Hot),
            other => Err(format!("unknown station: {}", other)),
        }
    }
}

/// One line of a cart as seen by the kitchen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    /// Minutes of station work; `None` falls back to [`DEFAULT_COOKING_MINUTES`]
    #[serde(default)]
    pub cooking_time_minutes: Option<f64>,
}

impl CartLine {
    pub fn new(item_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            cooking_time_minutes: None,
        }
    }

    pub fn with_cooking_time(mut self, minutes: f64) -> Self {
        self.cooking_time_minutes = Some(minutes);
        self
    }

    /// Effective station minutes: default when missing or non-finite, rounded, floored at 1
    pub fn effective_minutes(&self) -> u32 {
        let raw = self
            .cooking_time_minutes
            .filter(|m| m.is_finite())
            .unwrap_or(DEFAULT_COOKING_MINUTES);
        let rounded = raw.round();
        if rounded < 1.0 {
            1
        } else if rounded > u32::MAX as f64 {
            u32::MAX
        } else {
            rounded as u32
        }
    }
}

/// Order lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Cooking,
    Ready,
    Delivered,
}

impl OrderStatus {
    /// Orders still holding kitchen or dispatch attention
    pub fn is_active(&self) -> bool {
        !matches!(self, OrderStatus::Delivered)
    }

    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Cooking),
            OrderStatus::Cooking => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        self.next() == Some(to)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "cooking" => Ok(OrderStatus::Cooking),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// How a customer pays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
