//! Kitchen station load and ETA estimation
//!
//! Each station type is modelled as a pool of parallel cooks. The work queued on a
//! station (active orders plus the new cart) is divided by the number of staffed
//! stations of that type for the current shift, and the slowest station bounds the
//! ETA. A fixed floor covers minimum kitchen turnaround.
//!
//! # Formula
//! ```text
//! total   = sum(load(order) for order in queue) + load(cart)
//! cold    = ceil(total.cold / max(1, capacity.cold))
//! hot     = ceil(total.hot  / max(1, capacity.hot))
//! eta     = max(15, cold, hot)
//! ```

use std::collections::HashMap;
use std::ops::{Add, AddAssign};

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sushi_types::{CartLine, Station};

use crate::model::{CapacityTable, MenuItem, ShiftCapacity};

/// Minimum quoted ETA regardless of load
pub const MIN_ETA_MINUTES: u32 = 15;

/// Best-selling cold combos whose names contain frying keywords.
/// Checked before the cooking-method pattern.
static POPULAR_COLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)combo\s+tempura\s+fresh|promo\s+panko\s+fr[ií]o").expect("valid regex")
});

static HOT_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)tempura|frit[oa]s?|fried|furai|apanad[oa]s?|panko|breaded|gohan|donburi|\bbowl\b|saltead[oa]s?|saut[eé]|yakimeshi|teppanyaki",
    )
    .expect("valid regex")
});

/// Station for an item name by pattern heuristics
pub fn classify_station(name: &str) -> Station {
    if POPULAR_COLD.is_match(name) {
        Station::Cold
    } else if HOT_METHOD.is_match(name) {
        Station::Hot
    } else {
        Station::Cold
    }
}

/// Minutes of queued work per station
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationLoad {
    pub cold: u64,
    pub hot: u64,
}

impl StationLoad {
    /// Add work minutes to one station
    pub fn add_minutes(&mut self, station: Station, minutes: u32) {
        match station {
            Station::Cold => self.cold += u64::from(minutes),
            Station::Hot => self.hot += u64::from(minutes),
        }
    }

    /// Minutes queued on `station`
    pub fn for_station(&self, station: Station) -> u64 {
        match station {
            Station::Cold => self.cold,
            Station::Hot => self.hot,
        }
    }
}

impl Add for StationLoad {
    type Output = StationLoad;

    fn add(self, rhs: StationLoad) -> StationLoad {
        StationLoad {
            cold: self.cold + rhs.cold,
            hot: self.hot + rhs.hot,
        }
    }
}

impl AddAssign for StationLoad {
    fn add_assign(&mut self, rhs: StationLoad) {
        self.cold += rhs.cold;
        self.hot += rhs.hot;
    }
}

impl std::iter::Sum for StationLoad {
    fn sum<I: Iterator<Item = StationLoad>>(iter: I) -> Self {
        iter.fold(StationLoad::default(), |acc, load| acc + load)
    }
}

/// Load of a cart using only the name heuristic
pub fn sum_load_by_station(cart: &[CartLine]) -> StationLoad {
    StationClassifier::default().sum_load(cart)
}

/// Station lookup by declared menu metadata, falling back to the name heuristic
#[derive(Debug, Clone, Default)]
pub struct StationClassifier {
    by_item_id: HashMap<String, Station>,
}

impl StationClassifier {
    /// Classifier from the stations declared on menu items
    pub fn from_menu<'a>(items: impl IntoIterator<Item = &'a MenuItem>) -> Self {
        let by_item_id = items
            .into_iter()
            .filter_map(|item| item.station.map(|station| (item.id.clone(), station)))
            .collect();
        Self { by_item_id }
    }

    /// Declare the station for one item id
    pub fn with_station(mut self, item_id: impl Into<String>, station: Station) -> Self {
        self.by_item_id.insert(item_id.into(), station);
        self
    }

    /// Declared station for the line, else the name heuristic
    pub fn classify(&self, line: &CartLine) -> Station {
        self.by_item_id
            .get(&line.item_id)
            .copied()
            .unwrap_or_else(|| classify_station(&line.name))
    }

    /// Minutes of work per station for a cart
    pub fn sum_load(&self, cart: &[CartLine]) -> StationLoad {
        let mut load = StationLoad::default();
        for line in cart {
            load.add_minutes(self.classify(line), line.effective_minutes());
        }
        load
    }

    /// Number of items with a declared station
    pub fn declared_count(&self) -> usize {
        self.by_item_id.len()
    }
}

/// Full breakdown behind a quoted ETA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtaEstimate {
    pub minutes: u32,
    pub queue_load: StationLoad,
    pub cart_load: StationLoad,
    pub capacity: ShiftCapacity,
    pub cold_minutes: u32,
    pub hot_minutes: u32,
    /// Station that set the ETA, `None` when the floor applied
    pub bottleneck: Option<Station>,
}

impl EtaEstimate {
    /// Queue plus cart load
    pub fn total_load(&self) -> StationLoad {
        self.queue_load + self.cart_load
    }
}

#[derive(Debug, Clone, Default)]
pub struct StationLoadEstimator {
    classifier: StationClassifier,
    capacity: CapacityTable,
}

impl StationLoadEstimator {
    /// Estimator over a classifier and a capacity table
    pub fn new(classifier: StationClassifier, capacity: CapacityTable) -> Self {
        Self { classifier, capacity }
    }

    /// Classifier used for cart lines
    pub fn classifier(&self) -> &StationClassifier {
        &self.classifier
    }

    /// Capacity table by weekday
    pub fn capacity_table(&self) -> &CapacityTable {
        &self.capacity
    }

    /// Stations staffed on the day of `now`
    pub fn shift_capacity<D: Datelike>(&self, now: &D) -> ShiftCapacity {
        self.capacity.for_date(now)
    }

    /// ETA with the load and capacity behind it
    pub fn estimate<D: Datelike>(&self, active_queue: &[Vec<CartLine>], new_cart: &[CartLine], now: &D) -> EtaEstimate {
        let queue_load: StationLoad = active_queue
            .iter()
            .map(|cart| self.classifier.sum_load(cart))
            .sum();
        let cart_load = self.classifier.sum_load(new_cart);
        let total = queue_load + cart_load;
        let capacity = self.shift_capacity(now);

        let cold_minutes = station_minutes(total.cold, capacity.cold);
        let hot_minutes = station_minutes(total.hot, capacity.hot);

        let minutes = MIN_ETA_MINUTES.max(cold_minutes).max(hot_minutes);
        let bottleneck = if cold_minutes < MIN_ETA_MINUTES && hot_minutes < MIN_ETA_MINUTES {
            None
        } else if hot_minutes > cold_minutes {
            Some(Station::Hot)
        } else {
            Some(Station::Cold)
        };

        EtaEstimate {
            minutes,
            queue_load,
            cart_load,
            capacity,
            cold_minutes,
            hot_minutes,
            bottleneck,
        }
    }

    /// ETA in whole minutes
    pub fn compute_eta<D: Datelike>(&self, active_queue: &[Vec<CartLine>], new_cart: &[CartLine], now: &D) -> u32 {
        self.estimate(active_queue, new_cart, now).minutes
    }
}

fn station_minutes(load: u64, stations: u32) -> u32 {
    let minutes = load.div_ceil(u64::from(stations.max(1)));
    u32::try_from(minutes).unwrap_or(u32::MAX)
}
