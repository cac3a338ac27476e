//! Price-list ingestion.
//!
//! Reads CSV through the csv crate and spreadsheet formats through
//! calamine, checks the column contract, and hands typed rows to the
//! domain. The core assumes this stage already ran: it never sees a row
//! with a missing required column or a non-numeric price.

use std::{fs::File, io::Read, path::Path};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use crate::domain::PriceEntry;

pub const COLUMN_NAME: &str = "наименование";
pub const COLUMN_PRICE: &str = "цена";
pub const COLUMN_UNIT: &str = "ед изм";
/// Optional; absent column or blank cell becomes an empty note.
pub const COLUMN_NOTE: &str = "примечание";

#[derive(Debug, Error)]
pub enum PriceListError {
    #[error("не удалось открыть файл: {0}")]
    Io(#[from] std::io::Error),
    #[error("не удалось разобрать CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("не удалось разобрать книгу: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("в книге нет листов")]
    EmptyWorkbook,
    #[error("в файле нет колонок: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("строка {row}: цена {value:?} не является числом")]
    Price { row: usize, value: String },
}

/// Loads rows from a price-list file. `.csv` goes through the csv crate;
/// anything else is handed to calamine's format auto-detection.
pub fn load_price_list(path: &Path) -> Result<Vec<PriceEntry>, PriceListError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        read_csv(File::open(path)?)
    } else {
        read_workbook(path)
    }
}

/// Column positions resolved from a header row.
struct ColumnMap {
    name: usize,
    price: usize,
    unit: usize,
    note: Option<usize>,
}

impl ColumnMap {
    fn locate(headers: &[String]) -> Result<Self, PriceListError> {
        let position = |wanted: &str| headers.iter().position(|header| header == wanted);

        let name = position(COLUMN_NAME);
        let price = position(COLUMN_PRICE);
        let unit = position(COLUMN_UNIT);

        let missing: Vec<String> = [
            (COLUMN_NAME, name),
            (COLUMN_PRICE, price),
            (COLUMN_UNIT, unit),
        ]
        .iter()
        .filter(|(_, found)| found.is_none())
        .map(|(column, _)| format!("'{column}'"))
        .collect();

        if !missing.is_empty() {
            return Err(PriceListError::Schema { missing });
        }

        Ok(Self {
            // Checked right above.
            name: name.unwrap_or_default(),
            price: price.unwrap_or_default(),
            unit: unit.unwrap_or_default(),
            note: position(COLUMN_NOTE),
        })
    }
}

/// Reads CSV rows. Tolerates a UTF-8 BOM glued to the first header cell
/// and rows with fewer cells than the header.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<PriceEntry>, PriceListError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(clean_header).collect();
    let columns = ColumnMap::locate(&headers)?;

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let cell = |column: usize| record.get(column).unwrap_or("").trim();

        let name = cell(columns.name).to_string();
        if name.is_empty() {
            // Trailing blank lines are common in hand-edited lists.
            continue;
        }

        // Header is row 1, first record is row 2.
        let row_number = index + 2;
        rows.push(PriceEntry {
            name,
            note: columns
                .note
                .map(|column| cell(column).to_string())
                .unwrap_or_default(),
            price: parse_price(cell(columns.price), row_number)?,
            unit: cell(columns.unit).to_string(),
        });
    }

    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<PriceEntry>, PriceListError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(PriceListError::EmptyWorkbook)??;

    let mut row_iter = range.rows();
    let headers: Vec<String> = row_iter
        .next()
        .map(|row| row.iter().map(|c| clean_header(&c.to_string())).collect())
        .unwrap_or_default();
    let columns = ColumnMap::locate(&headers)?;

    let mut rows = Vec::new();
    for (index, row) in row_iter.enumerate() {
        let text = |column: usize| {
            row.get(column)
                .map(cell_text)
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        let name = text(columns.name);
        if name.is_empty() {
            continue;
        }

        let row_number = index + 2;
        let price = match row.get(columns.price) {
            Some(Data::Float(value)) => *value,
            Some(Data::Int(value)) => *value as f64,
            other => parse_price(&other.map(cell_text).unwrap_or_default(), row_number)?,
        };
        let note = columns.note.map(&text).unwrap_or_default();
        let unit = text(columns.unit);

        rows.push(PriceEntry {
            name,
            note,
            price,
            unit,
        });
    }

    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// Parses a price cell. Accepts a decimal comma and space or NBSP
/// thousands separators ("5 200,50").
fn parse_price(raw: &str, row: usize) -> Result<f64, PriceListError> {
    let normalized: String = raw
        .trim()
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '\u{a0}')
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();

    normalized
        .parse::<f64>()
        .map_err(|_| PriceListError::Price {
            row,
            value: raw.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
наименование,цена,ед изм,примечание
Cement bag,5000,bag,
Cement bag,5200,bag,50kg
Песок,\"1 200,50\",т,
";

    #[test]
    fn reads_a_full_price_list() {
        let rows = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Cement bag");
        assert_eq!(rows[0].note, "");
        assert_eq!(rows[1].note, "50kg");
        assert_eq!(rows[2].price, 1200.5);
        assert_eq!(rows[2].unit, "т");
    }

    #[test]
    fn note_column_may_be_absent() {
        let data = "наименование,цена,ед изм\nЦемент,5000,мешок\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].note, "");
    }

    #[test]
    fn bom_on_the_header_is_tolerated() {
        let data = "\u{feff}наименование,цена,ед изм\nЦемент,5000,мешок\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].name, "Цемент");
    }

    #[test]
    fn missing_columns_are_reported_together() {
        let data = "наименование,стоимость\nЦемент,5000\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        match err {
            PriceListError::Schema { missing } => {
                assert_eq!(missing, ["'цена'", "'ед изм'"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn bad_price_points_at_the_row() {
        let data = "наименование,цена,ед изм\nЦемент,дорого,мешок\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        match err {
            PriceListError::Price { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "дорого");
            }
            other => panic!("expected price error, got {other:?}"),
        }
    }

    #[test]
    fn blank_name_rows_are_skipped() {
        let data = "наименование,цена,ед изм\nЦемент,5000,мешок\n,,\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn load_dispatches_on_the_csv_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("прайс.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let rows = load_price_list(&path).unwrap();
        assert_eq!(rows.len(), 3);
    }
}
