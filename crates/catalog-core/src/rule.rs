//! Business rule records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A freeform IF/THEN business rule, optionally scoped to a product or a
/// coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Optional business code, e.g. `UW-012`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    #[serde(default)]
    pub name: String,

    /// The IF part.
    #[serde(default)]
    pub condition: String,

    /// The THEN part.
    #[serde(default)]
    pub outcome: String,

    /// Source document or section.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,

    #[serde(default)]
    pub proprietary: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        condition: impl Into<String>,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            condition: condition.into(),
            outcome: outcome.into(),
            ..Self::default()
        }
    }

    /// Stamps `created_at` (first save only) and `updated_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }

    /// The business code, or an empty string.
    pub fn code(&self) -> &str {
        self.rule_id.as_deref().unwrap_or("")
    }
}

impl Document for Rule {
    const KIND: &'static str = "rule";

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
