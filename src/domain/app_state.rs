#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use super::entities::{EstimateSettings, SelectionLine};
use super::estimate::PriceLookup;

/// Session state for the running app. The lookup is replaced wholesale on
/// every price-list load; selections live only for the session.
#[derive(Clone, Debug)]
pub struct AppState {
    pub lookup: Option<PriceLookup>,
    /// File name of the loaded price list, for the header line.
    pub source_name: Option<String>,
    /// Picked positions, in selection order.
    pub selections: Vec<SelectionLine>,
    pub markup_percent: f64,
    pub settings: EstimateSettings,
}

impl Default for AppState {
    fn default() -> Self {
        let settings = EstimateSettings::default();
        Self {
            lookup: None,
            source_name: None,
            selections: Vec::new(),
            markup_percent: settings.default_markup_percent,
            settings,
        }
    }
}

impl AppState {
    /// Installs a freshly built lookup and drops the previous selection —
    /// old keys may no longer exist in the new list.
    pub fn load_price_list(&mut self, source_name: impl Into<String>, lookup: PriceLookup) {
        self.lookup = Some(lookup);
        self.source_name = Some(source_name.into());
        self.selections.clear();
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selections.iter().any(|line| line.key == key)
    }

    /// Adds the key to the selection (quantity 1.0) or removes it when
    /// already picked.
    pub fn toggle_selection(&mut self, key: &str) {
        if let Some(index) = self.selections.iter().position(|line| line.key == key) {
            self.selections.remove(index);
        } else {
            self.selections.push(SelectionLine::new(key));
        }
    }

    pub fn remove_selection(&mut self, key: &str) {
        self.selections.retain(|line| line.key != key);
    }

    /// Updates the quantity for a picked key, clamping below zero to zero.
    pub fn set_quantity(&mut self, key: &str, quantity: f64) {
        if let Some(line) = self.selections.iter_mut().find(|line| line.key == key) {
            line.quantity = quantity.max(0.0);
        }
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.settings = persisted.settings;
        self.markup_percent = self.settings.default_markup_percent;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            settings: self.settings.clone(),
        }
    }
}

/// Slice of the state written to disk. Settings only; loaded price lists
/// and selections are deliberately session-scoped.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub settings: EstimateSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PriceEntry;

    fn lookup_with(names: &[&str]) -> PriceLookup {
        let rows: Vec<PriceEntry> = names
            .iter()
            .map(|name| PriceEntry {
                name: name.to_string(),
                note: String::new(),
                price: 10.0,
                unit: "шт".to_string(),
            })
            .collect();
        PriceLookup::from_entries(&rows)
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut state = AppState::default();
        state.toggle_selection("Цемент");
        assert!(state.is_selected("Цемент"));
        assert_eq!(state.selections[0].quantity, 1.0);
        state.toggle_selection("Цемент");
        assert!(!state.is_selected("Цемент"));
    }

    #[test]
    fn loading_a_new_list_clears_the_selection() {
        let mut state = AppState::default();
        state.load_price_list("a.csv", lookup_with(&["Цемент"]));
        state.toggle_selection("Цемент");
        state.load_price_list("b.csv", lookup_with(&["Песок"]));
        assert!(state.selections.is_empty());
        assert_eq!(state.source_name.as_deref(), Some("b.csv"));
    }

    #[test]
    fn set_quantity_clamps_negative_values() {
        let mut state = AppState::default();
        state.toggle_selection("Цемент");
        state.set_quantity("Цемент", -5.0);
        assert_eq!(state.selections[0].quantity, 0.0);
    }

    #[test]
    fn persisted_state_round_trips_through_json() {
        let mut state = AppState::default();
        state.settings.currency = "₽".to_string();
        state.settings.default_markup_percent = 7.5;

        let json = serde_json::to_string(&state.to_persisted()).unwrap();
        let restored: PersistedState = serde_json::from_str(&json).unwrap();

        let mut fresh = AppState::default();
        fresh.apply_persisted(restored);
        assert_eq!(fresh.settings.currency, "₽");
        assert_eq!(fresh.markup_percent, 7.5);
    }

    #[test]
    fn persisted_state_tolerates_missing_fields() {
        let restored: PersistedState = serde_json::from_str("{}").unwrap();
        assert_eq!(restored.settings, EstimateSettings::default());
    }
}
