//! Per-class pricing: driver pay rates, customer price and the billed
//! dead-km ratio.

use std::collections::BTreeSet;
use std::sync::Mutex;

use bevy_ecs::prelude::Resource;

use crate::booking::VehicleClass;

#[derive(Debug, Clone, Copy)]
pub struct RateCard {
    /// Driver pay per active km.
    pub active_pay: f64,
    /// Driver pay per dead km.
    pub dead_pay: f64,
    /// Customer price per billed km.
    pub customer_price: f64,
    /// Assumed dead share folded into the customer fare.
    pub dead_ratio: f64,
}

/// Rates applied when a class is missing from the table.
pub const FALLBACK_RATES: RateCard = RateCard {
    active_pay: 16.0,
    dead_pay: 10.0,
    customer_price: 20.0,
    dead_ratio: 0.40,
};

const CLASS_RATES: [RateCard; 9] = [
    RateCard { active_pay: 16.0, dead_pay: 10.0, customer_price: 20.0, dead_ratio: 0.40 },
    RateCard { active_pay: 20.0, dead_pay: 15.0, customer_price: 24.0, dead_ratio: 0.40 },
    RateCard { active_pay: 22.0, dead_pay: 18.0, customer_price: 28.0, dead_ratio: 0.40 },
    RateCard { active_pay: 26.0, dead_pay: 22.0, customer_price: 32.0, dead_ratio: 0.40 },
    RateCard { active_pay: 32.0, dead_pay: 28.0, customer_price: 40.0, dead_ratio: 0.40 },
    RateCard { active_pay: 40.0, dead_pay: 32.0, customer_price: 50.0, dead_ratio: 0.30 },
    RateCard { active_pay: 50.0, dead_pay: 40.0, customer_price: 60.0, dead_ratio: 0.30 },
    RateCard { active_pay: 60.0, dead_pay: 50.0, customer_price: 70.0, dead_ratio: 0.25 },
    RateCard { active_pay: 70.0, dead_pay: 60.0, customer_price: 80.0, dead_ratio: 0.25 },
];

/// Rate lookup keyed by vehicle class. Classes outside 1..=9 resolve to
/// [FALLBACK_RATES]; each such class is recorded once so the final report can
/// surface it.
#[derive(Debug, Resource)]
pub struct PricingTable {
    cards: [RateCard; 9],
    fallback_seen: Mutex<BTreeSet<u8>>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            cards: CLASS_RATES,
            fallback_seen: Mutex::new(BTreeSet::new()),
        }
    }
}

impl PricingTable {
    pub fn rates(&self, class: VehicleClass) -> RateCard {
        match class.0 {
            1..=9 => self.cards[(class.0 - 1) as usize],
            other => {
                if let Ok(mut seen) = self.fallback_seen.lock() {
                    seen.insert(other);
                }
                FALLBACK_RATES
            }
        }
    }

    /// Classes that were priced at fallback rates so far.
    pub fn fallback_classes(&self) -> Vec<u8> {
        self.fallback_seen
            .lock()
            .map(|seen| seen.iter().copied().collect())
            .unwrap_or_default()
    }
}
