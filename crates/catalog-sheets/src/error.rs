//! Error types for workbook reading and import planning.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error at line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },

    #[error("line {line}: unknown sheet {name:?} (expected Products, Coverages or Forms)")]
    UnknownSheet { line: usize, name: String },

    #[error("failed to open workbook: {0}")]
    Workbook(String),

    #[error("{sheet} row {row}: coverage rows need a productId")]
    MissingProductId { sheet: &'static str, row: usize },

    #[error("{sheet} row {row}: {reason}")]
    InvalidRow {
        sheet: &'static str,
        row: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, SheetError>;
