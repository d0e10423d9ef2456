//! Coverage records and amount formatting.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::form::Form;

/// A coverage provision of a product, described by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default)]
    pub form_number: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub form_edition_date: String,

    /// Display amounts such as `$1,000,000`.
    #[serde(default)]
    pub limits: Vec<String>,

    #[serde(default)]
    pub deductibles: Vec<String>,
}

impl Coverage {
    pub fn new(name: impl Into<String>, form_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            form_number: form_number.into(),
            ..Self::default()
        }
    }

    /// Returns `true` when `form` is the document this coverage points at.
    ///
    /// The form number must match; the edition must match too unless the
    /// coverage leaves it blank.
    pub fn matches_form(&self, form: &Form) -> bool {
        form.form_number == self.form_number
            && (self.form_edition_date.is_empty()
                || form.form_edition_date == self.form_edition_date)
    }

    /// Finds the linked form among `forms`.
    pub fn linked_form<'a>(&self, forms: &'a [Form]) -> Option<&'a Form> {
        forms.iter().find(|f| self.matches_form(f))
    }

    /// Replaces the limits, normalizing every amount and dropping blanks.
    pub fn set_limits<I: IntoIterator<Item = S>, S: AsRef<str>>(&mut self, raw: I) {
        self.limits = normalize_amounts(raw);
    }

    /// Replaces the deductibles, normalizing every amount and dropping blanks.
    pub fn set_deductibles<I: IntoIterator<Item = S>, S: AsRef<str>>(&mut self, raw: I) {
        self.deductibles = normalize_amounts(raw);
    }
}

impl Document for Coverage {
    const KIND: &'static str = "coverage";

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

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Formats a user-entered amount as `$` plus comma-grouped digits.
///
/// Every non-digit character is dropped first, so `"1000000"`, `"$1,000,000"`
/// and `"1 000 000 USD"` all render as `$1,000,000`. Input without digits
/// renders as the empty string.
pub fn format_amount(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    let trimmed = digits.trim_start_matches('0');
    let digits = if trimmed.is_empty() { "0" } else { trimmed };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn normalize_amounts<I: IntoIterator<Item = S>, S: AsRef<str>>(raw: I) -> Vec<String> {
    raw.into_iter()
        .map(|s| format_amount(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_amount_groups_digits() {
        assert_eq!(format_amount("100000"), "$100,000");
        assert_eq!(format_amount("1000000"), "$1,000,000");
        assert_eq!(format_amount("500"), "$500");
        assert_eq!(format_amount("$2,500"), "$2,500");
    }

    #[test]
    fn format_amount_without_digits_is_empty() {
        assert_eq!(format_amount("abc"), "");
        assert_eq!(format_amount(""), "");
    }

    #[test]
    fn format_amount_strips_leading_zeros() {
        assert_eq!(format_amount("007"), "$7");
        assert_eq!(format_amount("000"), "$0");
    }

    #[test]
    fn set_limits_drops_blanks() {
        let mut c = Coverage::new("Building", "CP 00 10");
        c.set_limits(["100000", "n/a", "250,000"]);
        assert_eq!(c.limits, vec!["$100,000", "$250,000"]);
    }

    #[test]
    fn form_match_uses_edition_when_present() {
        let mut form = Form::new("Building and Personal Property", "CP 00 10", "10/12");
        form.form_edition_date = "10/12".into();
        let mut other = form.clone();
        other.form_edition_date = "04/02".into();

        let mut cov = Coverage::new("Building", "CP 00 10");
        assert!(cov.matches_form(&form));
        assert!(cov.matches_form(&other));

        cov.form_edition_date = "04/02".into();
        let forms = vec![form, other];
        assert_eq!(cov.linked_form(&forms).unwrap().form_edition_date, "04/02");
    }
}
