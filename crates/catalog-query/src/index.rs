//! The in-memory search index.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use catalog_core::coverage::Coverage;
use catalog_core::form::Form;
use catalog_core::product::Product;
use catalog_core::step::Step;

use crate::score::{DEFAULT_THRESHOLD, accepts, score_key};

/// What an entry points at. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EntryKind {
    Product,
    Coverage,
    Form,
    Step,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Coverage => "Coverage",
            Self::Form => "Form",
            Self::Step => "Step",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub kind: EntryKind,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_name: String,
}

impl SearchEntry {
    /// `→ Product: <name>` for anything below a product, empty otherwise.
    pub fn breadcrumb(&self) -> String {
        match self.kind {
            EntryKind::Product => String::new(),
            _ => format!("→ Product: {}", self.product_name),
        }
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.form_number.as_deref())
            .chain(std::iter::once(self.product_name.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub entry: SearchEntry,
    pub breadcrumb: String,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
    threshold: f64,
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SearchIndex {
    /// Builds the index. Coverages and steps come paired with their
    /// product id, as returned by collection-group reads.
    pub fn build(
        products: &[Product],
        coverages: &[(String, Coverage)],
        forms: &[Form],
        steps: &[(String, Step)],
    ) -> Self {
        let names: HashMap<&str, &str> = products
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect();
        let product_name = |id: &str| names.get(id).copied().unwrap_or_default().to_string();

        let mut entries = Vec::with_capacity(
            products.len() + coverages.len() + forms.len() + steps.len(),
        );
        entries.extend(products.iter().map(|p| SearchEntry {
            kind: EntryKind::Product,
            id: p.id.clone(),
            name: p.name.clone(),
            form_number: None,
            product_id: None,
            product_name: String::new(),
        }));
        entries.extend(coverages.iter().map(|(pid, c)| SearchEntry {
            kind: EntryKind::Coverage,
            id: c.id.clone(),
            name: c.name.clone(),
            form_number: None,
            product_id: Some(pid.clone()),
            product_name: product_name(pid),
        }));
        entries.extend(forms.iter().map(|f| {
            let name = if f.form_name.is_empty() {
                f.form_number.clone()
            } else {
                f.form_name.clone()
            };
            SearchEntry {
                kind: EntryKind::Form,
                id: f.id.clone(),
                name,
                form_number: Some(f.form_number.clone()),
                product_id: f.product_id.clone(),
                product_name: f.product_id.as_deref().map(&product_name).unwrap_or_default(),
            }
        }));
        entries.extend(steps.iter().map(|(pid, s)| SearchEntry {
            kind: EntryKind::Step,
            id: s.id.clone(),
            name: s.label().to_string(),
            form_number: None,
            product_id: Some(pid.clone()),
            product_name: product_name(pid),
        }));

        Self {
            entries,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries matching `query`, best score first, then by kind. A blank
    /// query returns nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let score = entry
                    .keys()
                    .filter_map(|key| score_key(&query, key))
                    .fold(f64::INFINITY, f64::min);
                accepts(score, self.threshold).then(|| SearchHit {
                    breadcrumb: entry.breadcrumb(),
                    entry: entry.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then(a.entry.kind.cmp(&b.entry.kind))
        });
        hits
    }
}
