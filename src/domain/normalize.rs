// src/domain/normalize.rs

/// Canonical comparison form of a free-text field.
///
/// ASCII letters and digits are kept (lowercased). Everything else, accented
/// letters included, becomes whitespace; whitespace runs then collapse to a
/// single space and the ends are trimmed. Absent input gives "".
pub fn normalize(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let spaced: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
