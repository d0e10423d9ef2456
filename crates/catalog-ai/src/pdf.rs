//! PDF text extraction.

use tracing::debug;

use crate::error::{AiError, Result};

/// Extracts the text of every page of a PDF held in memory.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| AiError::Pdf(e.to_string()))?;
    debug!(bytes = bytes.len(), chars = text.len(), "extracted pdf text");
    if text.trim().is_empty() {
        return Err(AiError::EmptyText);
    }
    Ok(text)
}

/// Keeps the first `max_words` whitespace-separated words, joined by
/// single spaces.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncation_collapses_whitespace() {
        let text = "SECTION I\n\n  Property   Coverages\tA B";
        assert_eq!(truncate_words(text, 4), "SECTION I Property Coverages");
        assert_eq!(truncate_words(text, 100), "SECTION I Property Coverages A B");
        assert_eq!(truncate_words("", 10), "");
    }

    #[test]
    fn garbage_is_not_a_pdf() {
        assert!(matches!(
            extract_text(b"definitely not a pdf"),
            Err(AiError::Pdf(_))
        ));
    }
}
