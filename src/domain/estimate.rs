#![allow(dead_code)]

//! Core estimate math: lookup keys, lookup construction, line items and
//! totals. Pure functions over typed inputs; the UI recomputes the whole
//! estimate on every change.

use std::collections::HashMap;

use super::entities::{EstimateLine, EstimateTotals, PriceEntry, PriceInfo, SelectionLine};

/// Unit substituted when a selection no longer matches the loaded price
/// list (stale selection after a reload).
pub const DEFAULT_UNIT: &str = "шт";

/// Builds the lookup/display key for a price-list row.
///
/// Rows sharing a name are told apart by their note; a row without a note
/// keeps its bare name. A note containing " | " itself is not escaped, so
/// it can collide with another row's derived key. Known limitation.
pub fn derive_key(name: &str, note: &str) -> String {
    if note.is_empty() {
        name.to_string()
    } else {
        format!("{name} | {note}")
    }
}

/// Price/unit index over one loaded price list. Built once per load and
/// read-only afterwards; a new load replaces it wholesale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceLookup {
    entries: HashMap<String, PriceInfo>,
    keys: Vec<String>,
}

impl PriceLookup {
    /// Indexes rows by derived key, in file order. A later row with the
    /// same key silently overwrites the earlier one; the key keeps its
    /// first position in the ordered key list.
    pub fn from_entries(rows: &[PriceEntry]) -> Self {
        let mut entries = HashMap::with_capacity(rows.len());
        let mut keys = Vec::with_capacity(rows.len());
        for row in rows {
            let key = derive_key(&row.name, &row.note);
            let info = PriceInfo {
                price: row.price,
                unit: row.unit.clone(),
            };
            if entries.insert(key.clone(), info).is_none() {
                keys.push(key);
            }
        }
        Self { entries, keys }
    }

    pub fn resolve(&self, key: &str) -> Option<&PriceInfo> {
        self.entries.get(key)
    }

    /// Keys in price-list order, duplicates collapsed to their first
    /// occurrence.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Estimate {
    pub lines: Vec<EstimateLine>,
    pub totals: EstimateTotals,
}

/// Computes the itemized estimate for the picked selections, preserving
/// selection order.
///
/// Quantities below zero count as zero. A key missing from the lookup
/// resolves to price 0 and [`DEFAULT_UNIT`] instead of failing the pass.
/// Totals are taken from the unrounded subtotals; any rounding happens at
/// presentation time only. `markup_percent` is unconstrained — negative
/// values act as a discount.
pub fn compute_estimate(
    selections: &[SelectionLine],
    lookup: &PriceLookup,
    markup_percent: f64,
) -> Estimate {
    let mut lines = Vec::with_capacity(selections.len());
    let mut total = 0.0;

    for selection in selections {
        let quantity = selection.quantity.max(0.0);
        let (unit_price, unit) = match lookup.resolve(&selection.key) {
            Some(info) => (info.price, info.unit.clone()),
            None => (0.0, DEFAULT_UNIT.to_string()),
        };
        let subtotal = unit_price * quantity;
        total += subtotal;
        lines.push(EstimateLine {
            name: selection.key.clone(),
            unit,
            quantity,
            unit_price,
            subtotal,
        });
    }

    Estimate {
        lines,
        totals: EstimateTotals {
            total_before_markup: total,
            markup_percent,
            total_after_markup: total * (1.0 + markup_percent / 100.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, note: &str, price: f64, unit: &str) -> PriceEntry {
        PriceEntry {
            name: name.to_string(),
            note: note.to_string(),
            price,
            unit: unit.to_string(),
        }
    }

    #[test]
    fn key_without_note_is_the_bare_name() {
        assert_eq!(derive_key("Цемент М400", ""), "Цемент М400");
    }

    #[test]
    fn key_with_note_joins_with_pipe_separator() {
        assert_eq!(derive_key("Цемент М400", "50кг"), "Цемент М400 | 50кг");
    }

    #[test]
    fn duplicate_keys_keep_the_last_row() {
        let rows = vec![
            entry("Труба", "", 100.0, "м"),
            entry("Труба", "", 250.0, "шт"),
        ];
        let lookup = PriceLookup::from_entries(&rows);
        assert_eq!(lookup.len(), 1);
        let info = lookup.resolve("Труба").unwrap();
        assert_eq!(info.price, 250.0);
        assert_eq!(info.unit, "шт");
    }

    #[test]
    fn key_order_follows_first_occurrence() {
        let rows = vec![
            entry("Б", "", 1.0, "шт"),
            entry("А", "", 2.0, "шт"),
            entry("Б", "", 3.0, "шт"),
        ];
        let lookup = PriceLookup::from_entries(&rows);
        assert_eq!(lookup.keys(), ["Б", "А"]);
    }

    #[test]
    fn zero_quantity_still_produces_a_line() {
        let lookup = PriceLookup::from_entries(&[entry("Песок", "", 800.0, "т")]);
        let mut selection = SelectionLine::new("Песок");
        selection.quantity = 0.0;
        let estimate = compute_estimate(&[selection], &lookup, 10.0);
        assert_eq!(estimate.lines.len(), 1);
        assert_eq!(estimate.lines[0].subtotal, 0.0);
        assert_eq!(estimate.totals.total_before_markup, 0.0);
        assert_eq!(estimate.totals.total_after_markup, 0.0);
    }

    #[test]
    fn negative_quantity_is_clamped_to_zero() {
        let lookup = PriceLookup::from_entries(&[entry("Песок", "", 800.0, "т")]);
        let mut selection = SelectionLine::new("Песок");
        selection.quantity = -3.0;
        let estimate = compute_estimate(&[selection], &lookup, 0.0);
        assert_eq!(estimate.lines[0].quantity, 0.0);
        assert_eq!(estimate.lines[0].subtotal, 0.0);
    }

    #[test]
    fn missing_key_falls_back_to_defaults() {
        let lookup = PriceLookup::default();
        let estimate = compute_estimate(&[SelectionLine::new("Призрак")], &lookup, 15.0);
        assert_eq!(estimate.lines.len(), 1);
        assert_eq!(estimate.lines[0].unit, DEFAULT_UNIT);
        assert_eq!(estimate.lines[0].unit_price, 0.0);
        assert_eq!(estimate.totals.total_before_markup, 0.0);
    }

    #[test]
    fn zero_markup_keeps_the_total() {
        let lookup = PriceLookup::from_entries(&[entry("Краска", "", 1234.5, "л")]);
        let mut selection = SelectionLine::new("Краска");
        selection.quantity = 3.0;
        let estimate = compute_estimate(&[selection.clone()], &lookup, 0.0);
        assert_eq!(
            estimate.totals.total_after_markup,
            estimate.totals.total_before_markup
        );
    }

    #[test]
    fn markup_is_monotonic_for_nonnegative_totals() {
        let lookup = PriceLookup::from_entries(&[entry("Краска", "", 500.0, "л")]);
        let mut selection = SelectionLine::new("Краска");
        selection.quantity = 2.0;
        let selections = vec![selection];
        let mut previous = f64::NEG_INFINITY;
        for markup in [-50.0, -10.0, 0.0, 5.0, 11.0, 100.0] {
            let estimate = compute_estimate(&selections, &lookup, markup);
            assert!(estimate.totals.total_after_markup >= previous);
            previous = estimate.totals.total_after_markup;
        }
    }

    #[test]
    fn negative_markup_acts_as_a_discount() {
        let lookup = PriceLookup::from_entries(&[entry("Плитка", "", 1000.0, "м2")]);
        let estimate = compute_estimate(&[SelectionLine::new("Плитка")], &lookup, -10.0);
        assert_eq!(estimate.totals.total_after_markup, 900.0);
    }

    #[test]
    fn cement_scenario_matches_expected_totals() {
        let rows = vec![
            entry("Cement bag", "", 5000.0, "bag"),
            entry("Cement bag", "50kg", 5200.0, "bag"),
        ];
        let lookup = PriceLookup::from_entries(&rows);
        let mut first = SelectionLine::new("Cement bag");
        first.quantity = 2.0;
        let mut second = SelectionLine::new("Cement bag | 50kg");
        second.quantity = 3.0;

        let estimate = compute_estimate(&[first, second], &lookup, 11.0);

        assert_eq!(estimate.lines.len(), 2);
        assert_eq!(estimate.lines[0].name, "Cement bag");
        assert_eq!(estimate.lines[0].unit, "bag");
        assert_eq!(estimate.lines[0].subtotal, 10_000.0);
        assert_eq!(estimate.lines[1].name, "Cement bag | 50kg");
        assert_eq!(estimate.lines[1].subtotal, 15_600.0);
        assert_eq!(estimate.totals.total_before_markup, 25_600.0);
        assert!((estimate.totals.total_after_markup - 28_416.0).abs() < 1e-9);
    }

    #[test]
    fn empty_selection_yields_an_empty_estimate() {
        let lookup = PriceLookup::from_entries(&[entry("Цемент", "", 5000.0, "мешок")]);
        let estimate = compute_estimate(&[], &lookup, 11.0);
        assert!(estimate.lines.is_empty());
        assert_eq!(estimate.totals.total_before_markup, 0.0);
        assert_eq!(estimate.totals.total_after_markup, 0.0);
    }

    #[test]
    fn lines_preserve_selection_order() {
        let rows = vec![
            entry("А", "", 1.0, "шт"),
            entry("Б", "", 2.0, "шт"),
            entry("В", "", 3.0, "шт"),
        ];
        let lookup = PriceLookup::from_entries(&rows);
        let selections = vec![
            SelectionLine::new("В"),
            SelectionLine::new("А"),
            SelectionLine::new("Б"),
        ];
        let estimate = compute_estimate(&selections, &lookup, 0.0);
        let names: Vec<_> = estimate.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["В", "А", "Б"]);
    }
}
