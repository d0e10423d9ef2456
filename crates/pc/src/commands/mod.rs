//! Command handlers, one module per top-level subcommand.

pub mod completion;
pub mod config_cmd;
pub mod coverage;
pub mod export;
pub mod form;
pub mod import;
pub mod init;
pub mod price;
pub mod product;
pub mod rule;
pub mod search;
pub mod states;
pub mod step;
pub mod summarize;
pub mod table;
pub mod version;

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;

use crate::context::RuntimeContext;

/// Deletes are destructive; they need `--force` or the global `--yes`.
pub fn confirm_delete(ctx: &RuntimeContext, force: bool, what: &str) -> Result<()> {
    if !force && !ctx.yes {
        bail!(
            "deletion is destructive and cannot be undone.\n\
            Use --force to confirm deletion of {what}"
        );
    }
    Ok(())
}

/// Parses a factor value such as `1.25` or `-5`.
pub fn parse_value(raw: &str) -> Result<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .with_context(|| format!("invalid value '{raw}': expected a number"))
}

/// Parses a label into one of an enum's known values.
pub fn parse_label<T>(raw: &str, labels: &[&str], parse: fn(&str) -> Option<T>) -> Result<T> {
    match parse(raw.trim()) {
        Some(v) => Ok(v),
        None => bail!("invalid value '{raw}': expected one of {}", labels.join(", ")),
    }
}

/// Treats an empty string as "unset".
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::enums::Rounding;

    #[test]
    fn parse_value_accepts_signs_and_decimals() {
        assert_eq!(parse_value("-5").unwrap(), Decimal::from(-5));
        assert_eq!(parse_value(" 1.25 ").unwrap().to_string(), "1.25");
        assert!(parse_value("ten").is_err());
    }

    #[test]
    fn parse_label_lists_choices() {
        assert_eq!(
            parse_label("Whole Number", Rounding::LABELS, Rounding::parse_known).unwrap(),
            Rounding::WholeNumber
        );
        let err = parse_label("nearest", Rounding::LABELS, Rounding::parse_known).unwrap_err();
        assert!(err.to_string().contains("2 Decimals"));
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" p1 "), Some("p1".to_string()));
    }
}
