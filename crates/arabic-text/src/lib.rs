//! Arabic Text - shaping for layout engines without script support
//!
//! This crate provides:
//! - Contextual joining (presentation forms, lam-alef ligatures)
//! - Visual reordering of mixed Arabic/Latin/number text
//! - Width-driven line wrapping in logical order
//!
//! # Example
//!
//! ```
//! use arabic_text::shape;
//!
//! // Logical "لا" becomes the single lam-alef ligature glyph
//! assert_eq!(shape("لا"), "\u{FEFB}");
//!
//! // Latin text is left alone
//! assert_eq!(shape("Ali / 123"), "Ali / 123");
//! ```

mod bidi;
mod joining;
mod linebreak;

pub use bidi::{mirror, visual_order};
pub use joining::{is_transparent, joining_type, reshape, JoiningType};
pub use linebreak::wrap_to_width;

/// Check if every character fits in a single-byte Latin-1 encoding
///
/// Such text can contain no right-to-left characters and needs no shaping.
pub fn is_latin1(text: &str) -> bool {
    text.chars().all(|c| (c as u32) <= 0xFF)
}

/// Shape text for a left-to-right glyph layout engine
///
/// Each line (split on `\n`) is reshaped into presentation forms and then
/// reordered visually on its own. Empty and whitespace-only lines are
/// returned unchanged.
///
/// The output is meant for page-layout documents only. Word-processing
/// documents must receive the logical text together with a right-to-left
/// paragraph flag.
pub fn shape(text: &str) -> String {
    if is_latin1(text) {
        return text.to_string();
    }

    text.split('\n')
        .map(shape_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn shape_line(line: &str) -> String {
    if line.trim().is_empty() {
        return line.to_string();
    }
    visual_order(&reshape(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shape_empty_and_whitespace() {
        assert_eq!(shape(""), "");
        assert_eq!(shape("   "), "   ");
        assert_eq!(shape("\n"), "\n");
    }

    #[test]
    fn test_shape_latin_identity() {
        assert_eq!(shape("SalaryCertificate Ali 500"), "SalaryCertificate Ali 500");
    }

    #[test]
    fn test_shape_joins_and_reverses() {
        // بن -> initial beh + final noon, then reversed for display
        assert_eq!(shape("بن"), "\u{FEE6}\u{FE91}");
    }

    #[test]
    fn test_shape_lines_independent() {
        let shaped = shape("لا\nAli");
        assert_eq!(shaped, "\u{FEFB}\nAli");
    }

    #[test]
    fn test_shape_keeps_numbers_readable() {
        let shaped = shape("قدره 500");
        assert!(shaped.starts_with("500 "));
    }

    #[test]
    fn test_is_latin1() {
        assert!(is_latin1("café 12"));
        assert!(!is_latin1("راتب"));
    }
}
