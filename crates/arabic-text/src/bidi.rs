//! Visual reordering of mixed-direction text
//!
//! Layout engines that draw glyphs strictly left to right need the text
//! already in visual order. The Unicode bidirectional algorithm (via
//! `unicode-bidi`) resolves embedding levels; right-to-left runs are then
//! reversed with their brackets mirrored.

use unicode_bidi::BidiInfo;

/// Mirror a paired punctuation character for right-to-left display
pub fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        _ => c,
    }
}

/// Reorder a single line from logical to visual order
///
/// The paragraph direction is detected from the first strong character,
/// so a line that opens with Arabic is laid out right to left while
/// embedded numbers and Latin words keep their reading order.
pub fn visual_order(line: &str) -> String {
    if line.is_empty() {
        return String::new();
    }

    let info = BidiInfo::new(line, None);
    let mut result = String::with_capacity(line.len());

    for para in &info.paragraphs {
        let (levels, runs) = info.visual_runs(para, para.range.clone());
        for run in runs {
            let text = &line[run.clone()];
            if levels[run.start].is_rtl() {
                result.extend(text.chars().rev().map(mirror));
            } else {
                result.push_str(text);
            }
        }
    }

    result
}
