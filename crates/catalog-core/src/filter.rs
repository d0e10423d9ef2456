//! Case-insensitive substring filtering used by list commands.

use crate::coverage::Coverage;
use crate::form::Form;
use crate::product::Product;
use crate::rule::Rule;
use crate::step::Step;

/// Returns `true` if `haystack` contains `needle`, ignoring case. An empty
/// needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Records that can be narrowed by a free-text query.
pub trait Searchable {
    fn matches_query(&self, query: &str) -> bool;
}

impl Searchable for Product {
    fn matches_query(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
    }
}

impl Searchable for Coverage {
    fn matches_query(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
    }
}

impl Searchable for Form {
    fn matches_query(&self, query: &str) -> bool {
        contains_ignore_case(&self.form_name, query)
            || contains_ignore_case(&self.form_number, query)
    }
}

impl Searchable for Rule {
    fn matches_query(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query) || contains_ignore_case(self.code(), query)
    }
}

impl Searchable for Step {
    fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.is_factor() && contains_ignore_case(&self.step_name, query)
    }
}

/// Keeps the records matching `query` (all of them for an empty query).
pub fn filter_by_query<T: Searchable + Clone>(items: &[T], query: Option<&str>) -> Vec<T> {
    let query = query.map(str::trim).unwrap_or("");
    items
        .iter()
        .filter(|item| item.matches_query(query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Operand;
    use crate::step::StepBuilder;

    #[test]
    fn substring_ignores_case() {
        assert!(contains_ignore_case("Commercial Property", "PROP"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Auto", "home"));
    }

    #[test]
    fn form_matches_name_or_number() {
        let form = Form::new("Causes of Loss - Special Form", "CP 10 30", "06/07");
        assert!(form.matches_query("special"));
        assert!(form.matches_query("cp 10"));
        assert!(!form.matches_query("broad"));
    }

    #[test]
    fn rule_matches_name_or_code() {
        let mut rule = Rule::new("Protective devices", "IF alarm", "THEN credit");
        rule.rule_id = Some("UW-7".into());
        assert!(rule.matches_query("uw-7"));
        assert!(rule.matches_query("protective"));
    }

    #[test]
    fn operand_steps_only_match_empty_query() {
        let op = StepBuilder::operand(Operand::Add).build();
        assert!(op.matches_query(""));
        assert!(!op.matches_query("+"));
    }

    #[test]
    fn filter_trims_query() {
        let products = vec![Product::new("Homeowners", "HO-3"), Product::new("Auto", "PP 00 01")];
        let hits = filter_by_query(&products, Some("  home "));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Homeowners");
        assert_eq!(filter_by_query(&products, None).len(), 2);
    }
}
