//! JSONL rendition of a workbook.
//!
//! Each line is `{"sheet": "<name>", "row": {...}}`. Sheets are written in
//! the order Products, Coverages, Forms.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};
use crate::workbook::{Row, Sheet, Workbook};

#[derive(Serialize)]
struct LineOut<'a> {
    sheet: &'a str,
    row: &'a Row,
}

#[derive(Deserialize)]
struct LineIn {
    sheet: String,
    row: Row,
}

/// Writes every row of `workbook` as one JSON line.
pub fn write_jsonl<W: Write>(writer: &mut W, workbook: &Workbook) -> Result<()> {
    for sheet in Sheet::ALL {
        for row in workbook.sheet(sheet) {
            let line = LineOut {
                sheet: sheet.name(),
                row,
            };
            serde_json::to_writer(&mut *writer, &line)
                .map_err(|e| SheetError::Json { line: 0, source: e })?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Reads a workbook back. Empty lines are skipped.
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Workbook> {
    let mut workbook = Workbook::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parsed: LineIn = serde_json::from_str(trimmed).map_err(|e| SheetError::Json {
            line: line_number,
            source: e,
        })?;
        let sheet = Sheet::from_name(&parsed.sheet).ok_or_else(|| SheetError::UnknownSheet {
            line: line_number,
            name: parsed.sheet.clone(),
        })?;
        workbook.push(sheet, parsed.row);
    }
    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::io::BufReader;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn sample() -> Workbook {
        let mut wb = Workbook::default();
        wb.push(
            Sheet::Forms,
            row(json!({"id": "f1", "formName": "Policy Jacket", "formNumber": "IL 00 01"})),
        );
        wb.push(
            Sheet::Products,
            row(json!({"id": "p1", "name": "Homeowners", "availableStates": ["CA", "TX"]})),
        );
        wb.push(
            Sheet::Coverages,
            row(json!({"id": "c1", "productId": "p1", "name": "Dwelling", "limits": ["$300,000"]})),
        );
        wb
    }

    #[test]
    fn rendered_workbook() {
        let mut buf = Vec::new();
        write_jsonl(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        insta::assert_snapshot!(text, @r#"
        {"sheet":"Products","row":{"availableStates":["CA","TX"],"id":"p1","name":"Homeowners"}}
        {"sheet":"Coverages","row":{"id":"c1","limits":["$300,000"],"name":"Dwelling","productId":"p1"}}
        {"sheet":"Forms","row":{"formName":"Policy Jacket","formNumber":"IL 00 01","id":"f1"}}
        "#);
    }

    #[test]
    fn reads_back_what_it_writes() {
        let mut buf = Vec::new();
        write_jsonl(&mut buf, &sample()).unwrap();
        let read = read_jsonl(BufReader::new(buf.as_slice())).unwrap();
        assert_eq!(read, sample());
    }

    #[test]
    fn reports_line_numbers() {
        let data = b"{\"sheet\":\"Products\",\"row\":{}}\n\nnot-json\n";
        match read_jsonl(BufReader::new(data.as_slice())) {
            Err(SheetError::Json { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_sheet() {
        let data = b"{\"sheet\":\"Rules\",\"row\":{\"name\":\"x\"}}\n";
        let err = read_jsonl(BufReader::new(data.as_slice())).unwrap_err();
        assert!(matches!(err, SheetError::UnknownSheet { line: 1, .. }));
    }

    #[test]
    fn missing_sheets_are_empty() {
        let data = b"{\"sheet\":\"Forms\",\"row\":{\"formName\":\"A\"}}\n";
        let wb = read_jsonl(BufReader::new(data.as_slice())).unwrap();
        assert!(wb.products.is_empty());
        assert!(wb.coverages.is_empty());
        assert_eq!(wb.forms.len(), 1);
    }
}
