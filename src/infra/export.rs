//! Presentation and export formatting for a computed estimate.
//!
//! Monetary values are rounded to whole units here and only here; the
//! totals inside [`Estimate`] stay unrounded so rounding error never
//! compounds across line items.

use std::{fs, path::Path};

use thiserror::Error;

use crate::domain::{Estimate, EstimateLine};

/// Byte-order marker so spreadsheet tools decode the Cyrillic headers.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub const EXPORT_HEADER: [&str; 5] = ["Наименование", "Ед. изм", "Кол-во", "Цена", "Сумма"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("не удалось сформировать CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("не удалось записать файл: {0}")]
    Io(#[from] std::io::Error),
}

/// Rounds a monetary value for display and export, half away from zero.
pub fn round_money(value: f64) -> f64 {
    value.round()
}

/// Whole-unit money string for table cells and KPI cards.
pub fn format_money(value: f64) -> String {
    format!("{:.0}", round_money(value))
}

/// Quantities keep their fraction only when they have one.
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Serializes the estimate to CSV bytes: BOM, header row, one row per
/// line, trailing newline on every row.
pub fn render_export(estimate: &Estimate) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::from(UTF8_BOM));
    writer.write_record(EXPORT_HEADER)?;
    for line in &estimate.lines {
        writer.write_record(export_record(line))?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

/// Renders the estimate and writes it to `path`.
pub fn write_export(path: &Path, estimate: &Estimate) -> Result<(), ExportError> {
    let data = render_export(estimate)?;
    fs::write(path, data)?;
    Ok(())
}

fn export_record(line: &EstimateLine) -> [String; 5] {
    [
        line.name.clone(),
        line.unit.clone(),
        format_quantity(line.quantity),
        format_money(line.unit_price),
        format_money(line.subtotal),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{compute_estimate, PriceEntry, PriceLookup, SelectionLine};

    fn sample_estimate() -> Estimate {
        let rows = vec![
            PriceEntry {
                name: "Cement bag".to_string(),
                note: String::new(),
                price: 5000.4,
                unit: "bag".to_string(),
            },
            PriceEntry {
                name: "Cement bag".to_string(),
                note: "50kg".to_string(),
                price: 5200.0,
                unit: "bag".to_string(),
            },
        ];
        let lookup = PriceLookup::from_entries(&rows);
        let mut first = SelectionLine::new("Cement bag");
        first.quantity = 2.0;
        let mut second = SelectionLine::new("Cement bag | 50kg");
        second.quantity = 1.5;
        compute_estimate(&[first, second], &lookup, 11.0)
    }

    #[test]
    fn export_starts_with_a_bom() {
        let bytes = render_export(&sample_estimate()).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
    }

    #[test]
    fn export_rounds_money_but_not_totals() {
        let estimate = sample_estimate();
        // 5000.4 × 2 stays unrounded in the totals...
        assert_eq!(estimate.totals.total_before_markup, 10_000.8 + 7_800.0);

        // ...and rounds per cell in the export.
        let bytes = render_export(&estimate).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Наименование,Ед. изм,Кол-во,Цена,Сумма"));
        assert_eq!(lines.next(), Some("Cement bag,bag,2,5000,10001"));
        assert_eq!(lines.next(), Some("Cement bag | 50kg,bag,1.5,5200,7800"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn export_ends_each_row_with_a_newline() {
        let bytes = render_export(&sample_estimate()).unwrap();
        assert_eq!(bytes.last(), Some(&b'\n'));
    }

    #[test]
    fn export_round_trips_through_a_csv_reader() {
        let estimate = sample_estimate();
        let bytes = render_export(&estimate).unwrap();

        let mut reader = csv::Reader::from_reader(&bytes[3..]);
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), EXPORT_HEADER);

        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), estimate.lines.len());
        for (record, line) in records.iter().zip(&estimate.lines) {
            assert_eq!(record.get(0), Some(line.name.as_str()));
            assert_eq!(record.get(1), Some(line.unit.as_str()));
            assert_eq!(record.get(2), Some(format_quantity(line.quantity).as_str()));
            assert_eq!(record.get(3), Some(format_money(line.unit_price).as_str()));
            assert_eq!(record.get(4), Some(format_money(line.subtotal).as_str()));
        }
    }

    #[test]
    fn empty_estimate_exports_header_only() {
        let bytes = render_export(&Estimate::default()).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text, "Наименование,Ед. изм,Кол-во,Цена,Сумма\n");
    }

    #[test]
    fn write_export_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smeta.csv");
        write_export(&path, &sample_estimate()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
    }
}
