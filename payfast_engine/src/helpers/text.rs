/// The longest debug payload stored on an order
pub const DEBUG_INFO_MAX_LENGTH: usize = 255;

/// Returns at most the first `max` characters of `s`. Never splits a multibyte character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
