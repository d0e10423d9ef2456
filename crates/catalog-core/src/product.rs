//! Product records.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// An insurance product: the root of coverages and pricing steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Number of the product's base form.
    #[serde(default)]
    pub form_number: String,

    /// Blob URL of the uploaded base form PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_download_url: Option<String>,

    /// Two-letter codes of the states the product is sold in.
    #[serde(default)]
    pub available_states: Vec<String>,
}

impl Product {
    pub fn new(name: impl Into<String>, form_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            form_number: form_number.into(),
            ..Self::default()
        }
    }
}

impl Document for Product {
    const KIND: &'static str = "product";

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
