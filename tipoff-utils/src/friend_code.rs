/// Fixed length of a friend code (e.g. "ABC123").
pub const FRIEND_CODE_LEN: usize = 6;

/// Codes are compared case-insensitively; everything is normalized to
/// uppercase before any lookup or storage.
pub fn normalize_friend_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// A valid (already normalized) code is exactly six uppercase ASCII
/// letters or digits.
pub fn is_valid_friend_code(code: &str) -> bool {
    code.len() == FRIEND_CODE_LEN
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::{is_valid_friend_code, normalize_friend_code};

    #[test]
    fn normalization_trims_and_uppercases() {
        assert_eq!(normalize_friend_code("  abc123 "), "ABC123");
        assert_eq!(normalize_friend_code("XY9Z2Q"), "XY9Z2Q");
        assert_eq!(normalize_friend_code(""), "");
    }

    #[test]
    fn validation_accepts_six_alphanumerics_only() {
        assert!(is_valid_friend_code("ABC123"));
        assert!(is_valid_friend_code("ZZZZZZ"));
        assert!(!is_valid_friend_code("abc123"));
        assert!(!is_valid_friend_code("AB 123"));
        assert!(!is_valid_friend_code("ABC12"));
        assert!(!is_valid_friend_code("ABC1234"));
        assert!(!is_valid_friend_code(""));
    }
}
