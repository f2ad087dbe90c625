//! Width-driven line wrapping
//!
//! Wrapping happens in logical order, before shaping, so each wrapped line
//! can be reordered on its own. Wrapping an already-reordered right-to-left
//! paragraph would put its first words on the last line.

/// Greedily wrap `text` into lines no wider than `max_width`
///
/// `measure` returns the rendered width of a candidate line. Words are split
/// on whitespace and rejoined with single spaces. A word wider than
/// `max_width` is placed on a line of its own rather than broken.
pub fn wrap_to_width<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
