//! Ayu color theme and styling functions for console output.
//!
//! Color source: <https://github.com/ayu-theme/ayu-colors>

use owo_colors::OwoColorize;

use catalog_core::enums::Operand;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue
const OPERAND: (u8, u8, u8) = (0xd2, 0xa6, 0xff); // #d2a6ff - purple

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

pub const ICON_PASS: &str = "\u{2713}"; // ✓
pub const ICON_WARN: &str = "\u{26A0}"; // ⚠
pub const ICON_FAIL: &str = "\u{2716}"; // ✖

/// Selected state marker.
pub const ICON_SELECTED: &str = "\u{25A0}"; // ■
/// Unselected state marker.
pub const ICON_UNSELECTED: &str = "\u{25A1}"; // □

pub const SEPARATOR_LIGHT: &str = "\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}";

// ---------------------------------------------------------------------------
// Helpers: apply truecolor only when asked to
// ---------------------------------------------------------------------------

pub(crate) fn paint(s: &str, rgb: (u8, u8, u8), color: bool) -> String {
    if color {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

pub(crate) fn paint_bold(s: &str, rgb: (u8, u8, u8), color: bool) -> String {
    if color {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

pub(crate) fn paint_dimmed(s: &str, color: bool) -> String {
    if color {
        s.truecolor(MUTED.0, MUTED.1, MUTED.2).dimmed().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Semantic render helpers
// ---------------------------------------------------------------------------

pub fn render_pass(s: &str) -> String {
    paint(s, PASS, supports_color())
}

pub fn render_warn(s: &str) -> String {
    paint(s, WARN, supports_color())
}

pub fn render_fail(s: &str) -> String {
    paint(s, FAIL, supports_color())
}

pub fn render_muted(s: &str) -> String {
    paint(s, MUTED, supports_color())
}

pub fn render_accent(s: &str) -> String {
    paint(s, ACCENT, supports_color())
}

pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

/// Section header: uppercase, accent, bold.
pub fn render_category(s: &str) -> String {
    paint_bold(&s.to_uppercase(), ACCENT, supports_color())
}

pub fn render_separator() -> String {
    render_muted(SEPARATOR_LIGHT)
}

pub fn render_pass_icon() -> String {
    render_pass(ICON_PASS)
}

pub fn render_warn_icon() -> String {
    render_warn(ICON_WARN)
}

pub fn render_fail_icon() -> String {
    render_fail(ICON_FAIL)
}

// ---------------------------------------------------------------------------
// Catalog-specific renderers
// ---------------------------------------------------------------------------

/// Search result label such as `[Coverage]`.
pub fn render_kind(kind: &str) -> String {
    paint_bold(&format!("[{kind}]"), ACCENT, supports_color())
}

pub fn render_operand(operand: &Operand) -> String {
    paint_bold(operand.as_str(), OPERAND, supports_color())
}

/// Chain total; `N/A` is muted.
pub fn render_total(total: &str) -> String {
    if total == "N/A" {
        render_muted(total)
    } else {
        paint_bold(total, PASS, supports_color())
    }
}

/// Steps filtered out of view are dimmed rather than hidden.
pub fn render_dimmed(s: &str) -> String {
    paint_dimmed(s, supports_color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_when_color_off() {
        assert_eq!(paint("x", PASS, false), "x");
        assert_eq!(paint_bold("x", PASS, false), "x");
        assert_eq!(paint_dimmed("x", false), "x");
    }

    #[test]
    fn color_wraps_in_escape_codes() {
        let s = paint("ok", PASS, true);
        assert!(s.starts_with("\x1b["));
        assert!(s.contains("ok"));
        assert_ne!(paint_bold("ok", PASS, true), s);
    }

    #[test]
    fn separator_width() {
        assert_eq!(SEPARATOR_LIGHT.chars().count(), 40);
    }
}
