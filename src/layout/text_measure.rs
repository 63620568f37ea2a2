//! Text Measurement
//!
//! Auto-size views ask a [`TextMeasure`] collaborator how big their content
//! is. The engine only consumes the trait; [`CellMeasure`] is a ready-made
//! implementation measuring a view's text in terminal cells.
//!
//! Terminal text width depends on Unicode character widths:
//! - ASCII characters: 1 cell
//! - CJK characters: 2 cells (fullwidth)
//! - Emoji sequences: 2 cells
//! - Zero-width characters and control characters: 0 cells

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::types::Size;
use crate::view::View;

/// Measures a view's content for auto-size.
///
/// The returned size is the frame size the view would like, adornments
/// included. A zero extent collapses the view along that axis.
pub trait TextMeasure {
    fn measure(&self, view: &View, available: Size) -> Size;
}

impl<F> TextMeasure for F
where
    F: Fn(&View, Size) -> Size,
{
    fn measure(&self, view: &View, available: Size) -> Size {
        self(view, available)
    }
}

/// Measures `View::text` in terminal cells.
///
/// Lines break at `\n` and wrap at the available width left inside the
/// view's adornments. The adornment thickness is added back to the result.
/// Empty text measures as `Size::ZERO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMeasure;

impl TextMeasure for CellMeasure {
    fn measure(&self, view: &View, available: Size) -> Size {
        let text = view.text();
        if text.is_empty() {
            return Size::ZERO;
        }

        let thickness = view.adornments().total_thickness();
        let wrap_at = (available.width - thickness.horizontal()).max(0) as usize;

        let mut width = 0usize;
        let mut lines = 0usize;
        for line in text.split('\n') {
            let line_width = string_width(line);
            if wrap_at > 0 && line_width > wrap_at {
                width = width.max(wrap_at);
                lines += wrapped_line_count(line, wrap_at);
            } else {
                width = width.max(line_width);
                lines += 1;
            }
        }

        Size::new(
            width as i32 + thickness.horizontal(),
            lines as i32 + thickness.vertical(),
        )
    }
}

// =============================================================================
// Width
// =============================================================================

/// Display width of a grapheme cluster in terminal cells.
///
/// ZWJ sequences, VS16 presentation, skin tones, keycaps and flags are wide.
/// Base + combining marks take the base's width.
pub fn grapheme_width(grapheme: &str) -> usize {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return 0;
    };

    if grapheme.len() == first.len_utf8() {
        return first.width().unwrap_or(0);
    }

    // Regional indicator pair
    if (0x1F1E6..=0x1F1FF).contains(&(first as u32)) {
        return 2;
    }

    for c in chars {
        match c as u32 {
            0x200D | 0xFE0F | 0x20E3 | 0x1F3FB..=0x1F3FF => return 2,
            _ => {}
        }
    }

    first.width().unwrap_or(0)
}

/// Display width of a string in terminal cells.
pub fn string_width(s: &str) -> usize {
    // Fast path: printable ASCII is one cell per byte.
    if s.is_ascii() {
        return s.bytes().filter(|&b| b >= 0x20 && b != 0x7F).count();
    }
    s.graphemes(true).map(grapheme_width).sum()
}

/// Number of lines a single line of text takes when broken at any grapheme
/// boundary to fit `max_width`.
pub fn wrapped_line_count(line: &str, max_width: usize) -> usize {
    if max_width == 0 {
        return 1;
    }

    let mut lines = 1;
    let mut current = 0;
    for grapheme in line.graphemes(true) {
        let gw = grapheme_width(grapheme);
        if current + gw > max_width && current > 0 {
            lines += 1;
            current = 0;
        }
        current += gw;
    }
    lines
}

// =============================================================================
// Tests
// =============================================================================
