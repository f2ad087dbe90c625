//! Output file names

const INVALID: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Make a user-supplied string safe to embed in a file name
///
/// Reserved characters become `_`, surrounding whitespace is trimmed and
/// remaining spaces become `_`.
pub fn sanitize_filename(value: &str) -> String {
    value
        .replace(&INVALID[..], "_")
        .trim()
        .replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reserved_characters() {
        assert_eq!(sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_spaces() {
        assert_eq!(sanitize_filename("  أحمد محمد  "), "أحمد_محمد");
        assert_eq!(sanitize_filename("Ali"), "Ali");
    }
}
