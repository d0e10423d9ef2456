//! US state codes and product state availability.

use std::collections::BTreeSet;

/// The fifty two-letter state codes, in display order.
pub const ALL_STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

/// Error for a code that is not one of [`ALL_STATES`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown state code: {0}")]
pub struct UnknownState(pub String);

/// Normalizes a user-supplied code (`" ca "` -> `"CA"`) and checks it.
pub fn parse_state(code: &str) -> Result<&'static str, UnknownState> {
    let upper = code.trim().to_ascii_uppercase();
    ALL_STATES
        .iter()
        .copied()
        .find(|s| *s == upper)
        .ok_or(UnknownState(code.trim().to_owned()))
}

/// Position of a code in [`ALL_STATES`], used to keep selections ordered.
fn rank(code: &str) -> usize {
    ALL_STATES
        .iter()
        .position(|s| *s == code)
        .unwrap_or(ALL_STATES.len())
}

/// The set of states a product is available in.
///
/// Mutations keep the selection free of duplicates; [`StateSelection::codes`]
/// returns the codes in [`ALL_STATES`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSelection {
    selected: BTreeSet<(usize, String)>,
}

impl StateSelection {
    /// Builds a selection from stored codes. Unknown codes are kept as-is and
    /// sort after the known ones.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::default();
        for code in codes {
            let code = code.as_ref();
            selection.selected.insert((rank(code), code.to_owned()));
        }
        selection
    }

    pub fn contains(&self, code: &str) -> bool {
        self.selected.contains(&(rank(code), code.to_owned()))
    }

    /// Adds a state. Returns `false` when it was already selected.
    pub fn add(&mut self, code: &str) -> Result<bool, UnknownState> {
        let code = parse_state(code)?;
        Ok(self.selected.insert((rank(code), code.to_owned())))
    }

    /// Removes a state. Returns `false` when it was not selected.
    pub fn remove(&mut self, code: &str) -> Result<bool, UnknownState> {
        let code = parse_state(code)?;
        Ok(self.selected.remove(&(rank(code), code.to_owned())))
    }

    /// Flips a state's membership and returns whether it is now selected.
    pub fn toggle(&mut self, code: &str) -> Result<bool, UnknownState> {
        if self.remove(code)? {
            Ok(false)
        } else {
            self.add(code)?;
            Ok(true)
        }
    }

    pub fn select_all(&mut self) {
        for (i, code) in ALL_STATES.iter().enumerate() {
            self.selected.insert((i, (*code).to_owned()));
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected codes in display order.
    pub fn codes(&self) -> Vec<String> {
        self.selected.iter().map(|(_, c)| c.clone()).collect()
    }

    /// Selected codes containing `query`, case-insensitively.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_ascii_uppercase();
        self.selected
            .iter()
            .filter(|(_, c)| c.contains(&needle))
            .map(|(_, c)| c.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(parse_state(" ca ").unwrap(), "CA");
        assert_eq!(parse_state("XX"), Err(UnknownState("XX".into())));
    }

    #[test]
    fn add_ignores_duplicates() {
        let mut sel = StateSelection::default();
        assert!(sel.add("TX").unwrap());
        assert!(!sel.add("tx").unwrap());
        assert_eq!(sel.codes(), vec!["TX"]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = StateSelection::default();
        assert!(sel.toggle("NY").unwrap());
        assert!(sel.contains("NY"));
        assert!(!sel.toggle("NY").unwrap());
        assert!(sel.is_empty());
    }

    #[test]
    fn codes_follow_display_order() {
        let sel = StateSelection::from_codes(["WY", "AL", "CA"]);
        assert_eq!(sel.codes(), vec!["AL", "CA", "WY"]);
    }

    #[test]
    fn select_all_then_clear() {
        let mut sel = StateSelection::from_codes(["CA"]);
        sel.select_all();
        assert_eq!(sel.len(), 50);
        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn search_is_substring() {
        let sel = StateSelection::from_codes(["MA", "MD", "ME", "CA"]);
        assert_eq!(sel.search("m"), vec!["ME", "MD", "MA"]);
        assert_eq!(sel.search("a"), vec!["CA", "MA"]);
    }

    #[test]
    fn unknown_code_rejected_on_remove() {
        let mut sel = StateSelection::default();
        assert!(sel.remove("PR").is_err());
    }
}
