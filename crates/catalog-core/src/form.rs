//! Form records: the PDF documents behind products and coverages.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::enums::{FormCategory, FormType};

/// A policy form document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default)]
    pub form_name: String,

    #[serde(default)]
    pub form_number: String,

    /// Free text, usually `MM/YY`.
    #[serde(default)]
    pub effective_date: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub form_edition_date: String,

    #[serde(default, rename = "type")]
    pub form_type: FormType,

    #[serde(default)]
    pub category: FormCategory,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Blob path of the uploaded PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl Form {
    pub fn new(
        form_name: impl Into<String>,
        form_number: impl Into<String>,
        effective_date: impl Into<String>,
    ) -> Self {
        Self {
            form_name: form_name.into(),
            form_number: form_number.into(),
            effective_date: effective_date.into(),
            ..Self::default()
        }
    }

    /// Form number with the edition in parentheses when known.
    pub fn label(&self) -> String {
        if self.form_edition_date.is_empty() {
            self.form_number.clone()
        } else {
            format!("{} ({})", self.form_number, self.form_edition_date)
        }
    }
}

impl Document for Form {
    const KIND: &'static str = "form";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn display_name(&self) -> &str {
        if self.form_name.is_empty() {
            &self.form_number
        } else {
            &self.form_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_type_and_category() {
        let f: Form =
            serde_json::from_str(r#"{"formName":"Notice","formNumber":"IL 00 17"}"#).unwrap();
        assert_eq!(f.form_type, FormType::Proprietary);
        assert_eq!(f.category, FormCategory::BaseCoverageForm);
    }

    #[test]
    fn type_is_renamed_on_the_wire() {
        let mut f = Form::new("Common Policy Conditions", "IL 00 17", "11/98");
        f.form_type = FormType::Iso;
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["type"], "ISO");
        assert_eq!(v["effectiveDate"], "11/98");
    }

    #[test]
    fn display_name_falls_back_to_number() {
        let f = Form::new("", "CG 00 01", "04/13");
        assert_eq!(f.display_name(), "CG 00 01");
        assert_eq!(f.label(), "CG 00 01");
    }
}
