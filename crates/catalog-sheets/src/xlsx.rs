//! Excel workbook import through calamine.
//!
//! The first row of each sheet is the header. Empty cells are left out of
//! the row. Every other cell is read as text, since all imported fields are
//! strings; cells holding a JSON array (as `availableStates` or `limits`
//! are written) are read back as arrays.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, SheetError};
use crate::workbook::{Row, Sheet, Workbook};

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls"];

pub fn is_excel_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXCEL_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Reads the `Products`, `Coverages` and `Forms` sheets. Missing sheets are
/// empty; other sheets are ignored.
pub fn read_xlsx(path: &Path) -> Result<Workbook> {
    let mut excel = open_workbook_auto(path).map_err(|e| SheetError::Workbook(e.to_string()))?;
    let names = excel.sheet_names();
    let mut workbook = Workbook::default();

    for sheet in Sheet::ALL {
        if !names.iter().any(|n| n == sheet.name()) {
            debug!(sheet = sheet.name(), "sheet missing, treated as empty");
            continue;
        }
        let range = match excel.worksheet_range(sheet.name()) {
            Ok(range) => range,
            Err(e) => {
                warn!(sheet = sheet.name(), error = %e, "failed to read sheet");
                return Err(SheetError::Workbook(e.to_string()));
            }
        };
        for row in range_to_rows(&range) {
            workbook.push(sheet, row);
        }
    }
    Ok(workbook)
}

fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let columns: Vec<String> = header.iter().map(|c| cell_to_string(c).trim().to_string()).collect();

    rows.filter_map(|cells| {
        let row: Row = columns
            .iter()
            .zip(cells)
            .filter(|(name, _)| !name.is_empty())
            .filter_map(|(name, cell)| cell_to_value(cell).map(|v| (name.clone(), v)))
            .collect();
        (!row.is_empty()).then_some(row)
    })
    .collect()
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::Error(e) => format!("#ERROR: {e:?}"),
    }
}

/// JSON value of a cell, `None` when the cell is empty.
pub(crate) fn cell_to_value(cell: &Data) -> Option<Value> {
    let value = match cell {
        Data::Empty => return None,
        Data::String(s) => string_value(s)?,
        other => Value::String(cell_to_string(other)),
    };
    Some(value)
}

fn string_value(s: &str) -> Option<Value> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('[') {
        if let Ok(array @ Value::Array(_)) = serde_json::from_str::<Value>(trimmed) {
            return Some(array);
        }
    }
    Some(Value::String(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn excel_extensions() {
        assert!(is_excel_path(Path::new("catalog.xlsx")));
        assert!(is_excel_path(Path::new("CATALOG.XLS")));
        assert!(!is_excel_path(Path::new("catalog.jsonl")));
        assert!(!is_excel_path(Path::new("catalog")));
    }

    #[test]
    fn cell_values() {
        assert_eq!(cell_to_value(&Data::Empty), None);
        assert_eq!(cell_to_value(&Data::String("  ".into())), None);
        assert_eq!(cell_to_value(&Data::Float(1234.0)), Some(json!("1234")));
        assert_eq!(cell_to_value(&Data::Float(2.5)), Some(json!("2.5")));
        assert_eq!(cell_to_value(&Data::Int(7)), Some(json!("7")));
        assert_eq!(cell_to_value(&Data::Bool(true)), Some(json!("true")));
        assert_eq!(
            cell_to_value(&Data::String("[\"CA\",\"NY\"]".into())),
            Some(json!(["CA", "NY"]))
        );
        assert_eq!(
            cell_to_value(&Data::String("[draft".into())),
            Some(json!("[draft"))
        );
    }

    #[test]
    fn header_row_names_columns() {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("id".into()));
        range.set_value((0, 1), Data::String("name".into()));
        range.set_value((0, 2), Data::String("productId".into()));
        range.set_value((1, 0), Data::String("c1".into()));
        range.set_value((1, 1), Data::String("Building".into()));
        range.set_value((1, 2), Data::String("p1".into()));
        range.set_value((2, 1), Data::String("Glass".into()));

        let rows = range_to_rows(&range);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            Value::Object(rows[0].clone()),
            json!({"id": "c1", "name": "Building", "productId": "p1"})
        );
        assert_eq!(Value::Object(rows[1].clone()), json!({"name": "Glass"}));
    }

    #[test]
    fn missing_file_is_workbook_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_xlsx(&dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, SheetError::Workbook(_)));
    }
}
