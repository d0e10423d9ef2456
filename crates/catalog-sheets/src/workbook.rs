//! The workbook model and import planning.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::info;

use catalog_core::coverage::Coverage;
use catalog_core::document::{FORMS, PRODUCTS, coverages_of};
use catalog_core::form::Form;
use catalog_core::product::Product;

use crate::error::{Result, SheetError};

/// One spreadsheet row: column name to cell value.
pub type Row = Map<String, Value>;

/// Column that routes a coverage row to its product.
pub const PRODUCT_ID_COLUMN: &str = "productId";

const ID_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sheet {
    Products,
    Coverages,
    Forms,
}

impl Sheet {
    pub const ALL: [Sheet; 3] = [Sheet::Products, Sheet::Coverages, Sheet::Forms];

    pub fn name(self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Coverages => "Coverages",
            Self::Forms => "Forms",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Column used to seed ids for rows that have none.
    fn seed_column(self) -> &'static str {
        match self {
            Self::Forms => "formName",
            _ => "name",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub products: Vec<Row>,
    pub coverages: Vec<Row>,
    pub forms: Vec<Row>,
}

impl Workbook {
    pub fn sheet(&self, sheet: Sheet) -> &[Row] {
        match sheet {
            Sheet::Products => &self.products,
            Sheet::Coverages => &self.coverages,
            Sheet::Forms => &self.forms,
        }
    }

    pub fn push(&mut self, sheet: Sheet, row: Row) {
        match sheet {
            Sheet::Products => self.products.push(row),
            Sheet::Coverages => self.coverages.push(row),
            Sheet::Forms => self.forms.push(row),
        }
    }

    pub fn total_rows(&self) -> usize {
        self.products.len() + self.coverages.len() + self.forms.len()
    }
}

// ---------------------------------------------------------------------------
// Import planning
// ---------------------------------------------------------------------------

/// One document write produced by an import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOp {
    pub sheet: Sheet,
    pub collection: String,
    /// Existing id to overwrite; `None` asks the store for a fresh one.
    pub id: Option<String>,
    /// Text the fresh id is derived from.
    pub seed: String,
    /// Stored fields, without `id` (and without `productId` for coverages).
    pub body: Value,
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Rewrites numbers and booleans as text, inside arrays too. Every imported
/// field is a string or a list of strings.
fn coerce_scalars(value: &mut Value) {
    match value {
        Value::Number(n) => *value = Value::String(n.to_string()),
        Value::Bool(b) => *value = Value::String(b.to_string()),
        Value::Array(items) => items.iter_mut().for_each(coerce_scalars),
        _ => {}
    }
}

fn check_body<T: DeserializeOwned>(body: &Value) -> std::result::Result<(), String> {
    T::deserialize(body).map(|_| ()).map_err(|e| e.to_string())
}

/// Checks that a body reads back as the sheet's record type.
fn validate_body(sheet: Sheet, body: &Value) -> std::result::Result<(), String> {
    match sheet {
        Sheet::Products => check_body::<Product>(body),
        Sheet::Coverages => check_body::<Coverage>(body),
        Sheet::Forms => check_body::<Form>(body),
    }
}

/// Turns every row into a write. Fails on the first coverage row without a
/// `productId`, or on a row whose fields don't fit the sheet's record,
/// before anything is written.
pub fn plan_import(workbook: &Workbook) -> Result<Vec<ImportOp>> {
    let mut ops = Vec::with_capacity(workbook.total_rows());
    for sheet in Sheet::ALL {
        for (index, row) in workbook.sheet(sheet).iter().enumerate() {
            let mut fields = row.clone();
            let id = fields.remove(ID_COLUMN).as_ref().and_then(cell_text);
            let collection = match sheet {
                Sheet::Products => PRODUCTS.to_string(),
                Sheet::Forms => FORMS.to_string(),
                Sheet::Coverages => {
                    let product_id = fields
                        .remove(PRODUCT_ID_COLUMN)
                        .as_ref()
                        .and_then(cell_text)
                        .ok_or(SheetError::MissingProductId {
                            sheet: sheet.name(),
                            row: index + 1,
                        })?;
                    coverages_of(&product_id)
                }
            };
            let seed = fields
                .get(sheet.seed_column())
                .and_then(cell_text)
                .unwrap_or_else(|| sheet.name().to_string());
            fields.values_mut().for_each(coerce_scalars);
            let body = Value::Object(fields);
            validate_body(sheet, &body).map_err(|reason| SheetError::InvalidRow {
                sheet: sheet.name(),
                row: index + 1,
                reason,
            })?;
            ops.push(ImportOp {
                sheet,
                collection,
                id,
                seed,
                body,
            });
        }
    }
    info!(
        products = workbook.products.len(),
        coverages = workbook.coverages.len(),
        forms = workbook.forms.len(),
        "planned import"
    );
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    #[test]
    fn sheet_names_round_trip() {
        for sheet in Sheet::ALL {
            assert_eq!(Sheet::from_name(sheet.name()), Some(sheet));
        }
        assert_eq!(Sheet::from_name("products"), None);
    }

    #[test]
    fn coverage_rows_route_by_product() {
        let mut wb = Workbook::default();
        wb.push(
            Sheet::Coverages,
            row(json!({"id": "c1", "productId": "p1", "name": "Building"})),
        );
        wb.push(Sheet::Coverages, row(json!({"productId": "p2", "name": "Glass"})));

        let ops = plan_import(&wb).unwrap();
        assert_eq!(ops[0].collection, "products/p1/coverages");
        assert_eq!(ops[0].id.as_deref(), Some("c1"));
        assert_eq!(ops[0].body, json!({"name": "Building"}));
        assert_eq!(ops[1].collection, "products/p2/coverages");
        assert_eq!(ops[1].id, None);
        assert_eq!(ops[1].seed, "Glass");
    }

    #[test]
    fn coverage_without_product_is_rejected() {
        let mut wb = Workbook::default();
        wb.push(Sheet::Products, row(json!({"name": "Auto"})));
        wb.push(Sheet::Coverages, row(json!({"productId": "p1", "name": "A"})));
        wb.push(Sheet::Coverages, row(json!({"productId": "  ", "name": "B"})));
        let err = plan_import(&wb).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Coverages row 2: coverage rows need a productId"
        );
    }

    #[test]
    fn blank_and_numeric_ids() {
        let mut wb = Workbook::default();
        wb.push(Sheet::Forms, row(json!({"id": "", "formName": "Jacket"})));
        wb.push(Sheet::Forms, row(json!({"id": 42, "formNumber": "IL 00 01"})));
        let ops = plan_import(&wb).unwrap();
        assert_eq!(ops[0].id, None);
        assert_eq!(ops[0].seed, "Jacket");
        assert_eq!(ops[1].id.as_deref(), Some("42"));
        assert_eq!(ops[1].seed, "Forms");
        assert_eq!(ops[1].collection, "forms");
    }

    #[test]
    fn numeric_cells_become_text() {
        let mut wb = Workbook::default();
        wb.push(
            Sheet::Forms,
            row(json!({"formName": "Jacket", "formNumber": 1234, "effectiveDate": 2024})),
        );
        wb.push(
            Sheet::Coverages,
            row(json!({"productId": 7, "name": "Dwelling", "limits": [100000, 250000.5]})),
        );
        let ops = plan_import(&wb).unwrap();

        let coverage: Coverage = serde_json::from_value(ops[0].body.clone()).unwrap();
        assert_eq!(ops[0].collection, "products/7/coverages");
        assert_eq!(coverage.limits, vec!["100000", "250000.5"]);

        let form: Form = serde_json::from_value(ops[1].body.clone()).unwrap();
        assert_eq!(form.form_number, "1234");
        assert_eq!(form.effective_date, "2024");
    }

    #[test]
    fn mistyped_row_is_rejected_before_writing() {
        let mut wb = Workbook::default();
        wb.push(Sheet::Products, row(json!({"name": "Auto"})));
        wb.push(
            Sheet::Products,
            row(json!({"name": "Home", "availableStates": {"NY": true}})),
        );
        let err = plan_import(&wb).unwrap_err();
        assert!(matches!(
            err,
            SheetError::InvalidRow { sheet: "Products", row: 2, .. }
        ));
        assert!(err.to_string().starts_with("Products row 2: "));

        let mut wb = Workbook::default();
        wb.push(Sheet::Forms, row(json!({"formName": "F", "formNumber": ["A", "B"]})));
        let err = plan_import(&wb).unwrap_err();
        assert!(err.to_string().starts_with("Forms row 1: "));
    }

    #[test]
    fn sheets_are_planned_in_order() {
        let mut wb = Workbook::default();
        wb.push(Sheet::Forms, row(json!({"formName": "F"})));
        wb.push(Sheet::Products, row(json!({"name": "P"})));
        let sheets: Vec<Sheet> = plan_import(&wb).unwrap().iter().map(|op| op.sheet).collect();
        assert_eq!(sheets, vec![Sheet::Products, Sheet::Forms]);
    }
}
