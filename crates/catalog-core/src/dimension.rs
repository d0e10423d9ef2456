//! Rating table dimensions attached to a factor step.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::enums::DimensionType;

/// Maximum number of dimensions a table can have (one row axis, one column
/// axis).
pub const MAX_DIMENSIONS: usize = 2;

/// One axis of a factor's rating table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Comma-separated axis labels, e.g. `"Frame, Masonry, Fire Resistive"`.
    #[serde(default)]
    pub values: String,

    #[serde(default)]
    pub technical_code: String,

    #[serde(default, rename = "type")]
    pub dim_type: DimensionType,
}

impl Dimension {
    pub fn new(
        name: impl Into<String>,
        values: impl Into<String>,
        technical_code: impl Into<String>,
        dim_type: DimensionType,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            values: values.into(),
            technical_code: technical_code.into(),
            dim_type,
        }
    }

    /// Axis labels, split on commas and trimmed.
    pub fn labels(&self) -> Vec<String> {
        self.values.split(',').map(|v| v.trim().to_owned()).collect()
    }
}

impl Document for Dimension {
    const KIND: &'static str = "dimension";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// The row-by-column grid of a rating table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrid {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
}

impl TableGrid {
    /// Builds the grid from a step's dimensions. A missing axis contributes a
    /// single blank label so the grid always has at least one cell.
    pub fn from_dimensions(dimensions: &[Dimension]) -> Self {
        let axis = |t: DimensionType| {
            dimensions
                .iter()
                .find(|d| d.dim_type == t)
                .map(Dimension::labels)
                .unwrap_or_else(|| vec![String::new()])
        };
        Self {
            rows: axis(DimensionType::Row),
            columns: axis(DimensionType::Column),
        }
    }

    /// Cell keys in row-major order, formatted `row-column`.
    pub fn cell_keys(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|r| self.columns.iter().map(move |c| format!("{r}-{c}")))
            .collect()
    }
}
