//! Text layouts: aligned columns, the state map, rating table grids.

use catalog_core::dimension::TableGrid;
use catalog_core::states::{ALL_STATES, StateSelection};

use crate::styles::{ICON_SELECTED, ICON_UNSELECTED, paint, paint_bold};
use crate::terminal::{supports_color, terminal_width};

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c);
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80);

/// Width of one state map cell: marker, space, code, two spaces.
const STATE_CELL_WIDTH: usize = 6;
const MAX_STATES_PER_ROW: usize = 10;

const EMPTY_CELL: &str = "\u{00B7}"; // ·

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}

/// Left-aligned columns separated by two spaces. The header is bolded when
/// color is on. Trailing whitespace is trimmed from each line.
pub fn render_columns(header: &[&str], rows: &[Vec<String>]) -> String {
    columns(header, rows, supports_color())
}

fn columns(header: &[&str], rows: &[Vec<String>], color: bool) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| pad(c, widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 1);
    let head = line(header.iter().map(|h| h.to_string()).collect());
    out.push(if color {
        paint_bold(&head, MUTED, true)
    } else {
        head
    });
    out.extend(rows.iter().map(|r| line(r.clone())));
    out.join("\n")
}

/// All 50 states in rows, selected ones marked and highlighted.
pub fn render_state_map(selection: &StateSelection) -> String {
    let per_row = (terminal_width() / STATE_CELL_WIDTH).clamp(1, MAX_STATES_PER_ROW);
    state_map(selection, per_row, supports_color())
}

fn state_map(selection: &StateSelection, per_row: usize, color: bool) -> String {
    ALL_STATES
        .chunks(per_row.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .map(|code| {
                    if selection.contains(code) {
                        paint_bold(&format!("{ICON_SELECTED} {code}"), PASS, color)
                    } else {
                        paint(&format!("{ICON_UNSELECTED} {code}"), MUTED, color)
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The grid preview: column labels across the top, row labels down the
/// side, and an empty marker in every cell.
pub fn render_grid(grid: &TableGrid) -> String {
    let header: Vec<&str> = std::iter::once("")
        .chain(grid.columns.iter().map(String::as_str))
        .collect();
    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|r| {
            std::iter::once(r.clone())
                .chain(grid.columns.iter().map(|_| EMPTY_CELL.to_string()))
                .collect()
        })
        .collect();
    columns(&header, &rows, supports_color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::dimension::{Dimension, TableGrid};
    use catalog_core::enums::DimensionType;
    use pretty_assertions::assert_eq;

    #[test]
    fn columns_align() {
        let out = columns(
            &["ID", "NAME"],
            &[
                vec!["p1".into(), "Homeowners".into()],
                vec!["product-2".into(), "Auto".into()],
            ],
            false,
        );
        assert_eq!(
            out,
            "ID         NAME\np1         Homeowners\nproduct-2  Auto"
        );
    }

    #[test]
    fn state_map_marks_selection() {
        let selection = StateSelection::from_codes(["AK", "AZ"]);
        let out = state_map(&selection, 5, false);
        let first = out.lines().next().unwrap();
        assert_eq!(first, "□ AL  ■ AK  ■ AZ  □ AR  □ CA");
        assert_eq!(out.lines().count(), 10);
    }

    #[test]
    fn grid_with_missing_column_axis() {
        let dims = vec![Dimension::new("Construction", "Frame,Masonry", "C", DimensionType::Row)];
        let grid = TableGrid::from_dimensions(&dims);
        let out = columns(
            &["", ""],
            &grid
                .rows
                .iter()
                .map(|r| vec![r.clone(), EMPTY_CELL.to_string()])
                .collect::<Vec<_>>(),
            false,
        );
        assert_eq!(out, "\nFrame    ·\nMasonry  ·");
    }
}
