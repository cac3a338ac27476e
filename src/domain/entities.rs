#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// One validated row of a loaded price list.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceEntry {
    pub name: String,
    /// Optional clarification column; empty string when the source cell is
    /// absent or blank, never "missing".
    pub note: String,
    pub price: f64,
    pub unit: String,
}

/// Price and unit resolved for one lookup key.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceInfo {
    pub price: f64,
    pub unit: String,
}

/// One position the user picked for the estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionLine {
    pub key: String,
    pub quantity: f64,
}

impl SelectionLine {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            quantity: 1.0,
        }
    }
}

/// Computed estimate row. Derived, never edited directly; the whole
/// estimate is recomputed from the selections on every input change.
#[derive(Clone, Debug, PartialEq)]
pub struct EstimateLine {
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EstimateTotals {
    pub total_before_markup: f64,
    pub markup_percent: f64,
    pub total_after_markup: f64,
}

/// User-tunable presentation settings. The only state that survives an
/// application restart; estimates themselves never persist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateSettings {
    pub currency: String,
    pub default_markup_percent: f64,
}

impl Default for EstimateSettings {
    fn default() -> Self {
        Self {
            currency: "₸".to_string(),
            default_markup_percent: 11.0,
        }
    }
}
