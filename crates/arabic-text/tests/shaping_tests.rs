//! Shaping and wrapping through the public API

use arabic_text::{is_latin1, shape, wrap_to_width};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn char_count(s: &str) -> f64 {
    s.chars().count() as f64
}

#[test]
fn test_latin_passthrough() {
    let text = "Civil ID: 280010100001\nSalary: 500 KD";
    assert!(is_latin1(text));
    assert_eq!(shape(text), text);
}

#[test]
fn test_lines_shaped_independently() {
    let shaped = shape("شهادة راتب\n\nإجازة");
    let lines: Vec<_> = shaped.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "");
    assert_eq!(lines[0], shape("شهادة راتب"));
    assert_eq!(lines[2], shape("إجازة"));
}

#[test]
fn test_shaped_arabic_uses_presentation_forms() {
    let shaped = shape("راتب");
    assert!(shaped
        .chars()
        .all(|c| ('\u{FB50}'..='\u{FEFF}').contains(&c)));
}

#[test]
fn test_wrap_then_shape_keeps_first_words_first() {
    let lines = wrap_to_width("الخليج العالمية لتشييد المباني", 16.0, char_count);
    assert_eq!(lines, vec!["الخليج العالمية", "لتشييد المباني"]);
}

proptest! {
    #[test]
    fn prop_wrap_preserves_words(words in prop::collection::vec("[a-z]{1,8}", 0..30), width in 1.0f64..40.0) {
        let text = words.join(" ");
        let lines = wrap_to_width(&text, width, char_count);
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn prop_wrapped_lines_fit_unless_single_word(words in prop::collection::vec("[a-z]{1,8}", 1..30), width in 1.0f64..40.0) {
        let text = words.join(" ");
        for line in wrap_to_width(&text, width, char_count) {
            prop_assert!(char_count(&line) <= width || !line.contains(' '));
        }
    }

    #[test]
    fn prop_shape_keeps_line_count(text in "[a-z\u{0627}-\u{064A} \n]{0,40}") {
        prop_assert_eq!(shape(&text).split('\n').count(), text.split('\n').count());
    }
}

#[test]
fn test_lam_alef_ligature_with_fatha() {
    assert_eq!(shape("\u{0644}\u{0627}"), "\u{FEFB}");
    let shaped: Vec<char> = shape("\u{0644}\u{064E}\u{0627}").chars().collect();
    assert!(shaped.contains(&'\u{FEFB}'));
    assert!(!shaped.contains(&'\u{FEDF}'));
    assert!(!shaped.contains(&'\u{FE8E}'));
}
