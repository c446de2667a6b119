//! Plain-text layout shared by the grid view and the text exporter.

use crate::model::grid::{CellPos, GRID_SIZE};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Default display width, in terminal columns, of one cell in a rendered sheet.
pub const DEFAULT_CELL_WIDTH: usize = 12;
const MIN_CELL_WIDTH: usize = 3;

/// Renders the 9x9 board in its spatial arrangement.
///
/// Block `b` sits at row `b / 3`, column `b % 3`; cell `c` sits at the same
/// relative position inside its block.
pub fn render_sheet(cell_width: usize, mut text: impl FnMut(CellPos) -> String) -> String {
    let width = cell_width.max(MIN_CELL_WIDTH);
    let segment = "-".repeat(width * 3 + 4);
    let rule = format!("+{segment}+{segment}+{segment}+\n");

    let mut out = String::new();
    for row in 0..GRID_SIZE {
        if row % 3 == 0 {
            out.push_str(&rule);
        }
        out.push('|');
        for block_col in 0..3 {
            let cells = (0..3)
                .map(|cell_col| {
                    let block = (row / 3) * 3 + block_col;
                    let cell = (row % 3) * 3 + cell_col;
                    fit(&text(CellPos::new(block, cell)), width)
                })
                .collect::<Vec<_>>();
            out.push(' ');
            out.push_str(&cells.join(" "));
            out.push_str(" |");
        }
        out.push('\n');
    }
    out.push_str(&rule);
    out
}

/// Text shown for one element: its value, or `<placeholder>` while empty.
pub fn shown(value: &str, placeholder: &str) -> String {
    if !value.is_empty() || placeholder.is_empty() {
        value.to_string()
    } else {
        format!("<{placeholder}>")
    }
}

/// Flattens line breaks and pads or ellipsizes to exactly `width` columns.
///
/// Widths are display columns, so wide (CJK) graphemes count double and are
/// never split.
fn fit(value: &str, width: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    let total = UnicodeWidthStr::width(flat.as_str());
    if total <= width {
        return pad(flat, total, width);
    }

    let target = width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0usize;
    for grapheme in flat.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if used + w > target {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push('…');
    pad(out, used + 1, width)
}

fn pad(mut text: String, used: usize, width: usize) -> String {
    text.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    text
}

#[cfg(test)]
mod tests {
    use super::{fit, render_sheet, shown};
    use crate::model::grid::CellPos;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn fit_pads_and_truncates_by_display_width() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("a\nb", 3), "a b");
        assert_eq!(fit("abcdef", 4), "abc…");
        // Hangul syllables take two columns each.
        assert_eq!(fit("건강", 4), "건강");
        assert_eq!(fit("한국어입니다", 4), "한… ");
        assert_eq!(fit("한국어입니다", 6), "한국… ");
    }

    #[test]
    fn fit_keeps_combining_marks_with_their_base() {
        // "e" + combining acute is one grapheme one column wide.
        assert_eq!(fit("e\u{301}e\u{301}xyz", 3), "e\u{301}e\u{301}…");
    }

    #[test]
    fn wide_text_keeps_every_sheet_line_aligned() {
        let sheet = render_sheet(12, |pos| {
            if pos == CellPos::new(0, 0) {
                "건강한 생활 습관".to_string()
            } else if pos == CellPos::new(4, 4) {
                "목표".to_string()
            } else {
                String::new()
            }
        });
        let widths = sheet
            .lines()
            .map(UnicodeWidthStr::width)
            .collect::<Vec<_>>();
        assert_eq!(widths.len(), 13);
        assert!(widths.iter().all(|w| *w == widths[0]), "widths: {widths:?}");
        assert!(sheet.contains("건강한 생활…"));
    }

    #[test]
    fn sheet_places_blocks_spatially() {
        let sheet = render_sheet(3, |pos| {
            if pos == CellPos::new(8, 8) {
                "end".to_string()
            } else if pos == CellPos::new(0, 0) {
                "top".to_string()
            } else {
                String::new()
            }
        });
        let lines = sheet.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 13);
        assert!(lines[1].starts_with("| top"));
        assert!(lines[11].ends_with("end |"));
    }

    #[test]
    fn shown_uses_placeholder_only_when_empty() {
        assert_eq!(shown("", "Sub Goal"), "<Sub Goal>");
        assert_eq!(shown("Health", "Sub Goal"), "Health");
        assert_eq!(shown("", ""), "");
    }
}
