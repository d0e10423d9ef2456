//! Match scoring. Scores run from 0 (exact) to 1 (unrelated).

/// Cutoff used when the config does not set one.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Upper bound of a substring hit's score.
const SUBSTRING_BAND: f64 = 0.1;

/// Scores `query` against one key. `query` must already be lowercased and
/// trimmed. Returns `None` for an empty key.
///
/// A substring hit scores inside `[0, 0.1]`, shorter keys first. Anything
/// else is the Jaro-Winkler distance to the whole key or to its closest
/// word, whichever is smaller.
pub fn score_key(query: &str, key: &str) -> Option<f64> {
    let key = key.trim().to_lowercase();
    if key.is_empty() || query.is_empty() {
        return None;
    }
    if key.contains(query) {
        let coverage = query.chars().count() as f64 / key.chars().count() as f64;
        return Some(SUBSTRING_BAND * (1.0 - coverage));
    }
    let whole = 1.0 - strsim::jaro_winkler(query, &key);
    let best_word = key
        .split_whitespace()
        .map(|word| 1.0 - strsim::jaro_winkler(query, word))
        .fold(whole, f64::min);
    Some(best_word)
}

/// Whether a score passes `threshold`. Substring hits always pass.
pub fn accepts(score: f64, threshold: f64) -> bool {
    score <= threshold.max(SUBSTRING_BAND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_zero() {
        assert_eq!(score_key("auto", "Auto"), Some(0.0));
    }

    #[test]
    fn substring_ranks_shorter_key_first() {
        let short = score_key("home", "Homeowners").unwrap();
        let long = score_key("home", "Homeowners Extended Replacement Cost").unwrap();
        assert!(short < long);
        assert!(long <= SUBSTRING_BAND);
    }

    #[test]
    fn typo_scores_close() {
        let s = score_key("comercial property", "Commercial Property").unwrap();
        assert!(s < DEFAULT_THRESHOLD, "score {s}");
    }

    #[test]
    fn single_word_typo_matches_a_word() {
        let s = score_key("covrage", "Building Coverage").unwrap();
        assert!(s < DEFAULT_THRESHOLD, "score {s}");
    }

    #[test]
    fn unrelated_is_far() {
        let s = score_key("umbrella", "Inland Marine").unwrap();
        assert!(!accepts(s, DEFAULT_THRESHOLD), "score {s}");
    }

    #[test]
    fn empty_key_never_scores() {
        assert_eq!(score_key("auto", "  "), None);
    }
}
