//! Spreadsheet import and export for the product catalog.
//!
//! A [`Workbook`] holds the `Products`, `Coverages` and `Forms` sheets as
//! rows of JSON fields. It is written as JSONL and read back from JSONL or
//! from an Excel workbook; [`plan_import`] turns it into store writes.

pub mod error;
pub mod jsonl;
pub mod workbook;
pub mod xlsx;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use error::{Result, SheetError};
pub use workbook::{ImportOp, Row, Sheet, Workbook, plan_import};

/// Reads a workbook, choosing the format from the file extension: Excel
/// extensions go through calamine, anything else is read as JSONL.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    if xlsx::is_excel_path(path) {
        xlsx::read_xlsx(path)
    } else {
        jsonl::read_jsonl(BufReader::new(File::open(path)?))
    }
}
