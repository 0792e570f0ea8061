//! Short code generation and alias validation utilities.
//!
//! Generated codes are 7 characters drawn from the URL-safe alphabet
//! `A-Za-z0-9_-`. User aliases share the alphabet but choose their own length.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;

/// Length of generated short codes.
pub const CODE_LENGTH: usize = 7;

/// Alphabet of generated codes; matches the characters allowed in aliases.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub const ALIAS_MIN_LENGTH: usize = 3;
pub const ALIAS_MAX_LENGTH: usize = 20;

/// Character rule for aliases: `[A-Za-z0-9_-]+`.
pub static ALIAS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").unwrap_or_else(|e| panic!("invalid alias pattern: {e}"))
});

/// Aliases that collide with top-level routes. Matched case-insensitively.
pub const RESERVED_ALIASES: &[&str] = &["api", "health", "admin", "analytics"];

/// Generates a random 7-character short code.
///
/// Uniqueness is not guaranteed here; callers check the store and retry.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 7);
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns `true` if `alias` is a reserved word, ignoring ASCII case.
pub fn is_reserved(alias: &str) -> bool {
    RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
}

/// Validates a user-provided alias.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: ASCII letters, digits, `_` and `-`
/// - Cannot be a reserved word in any letter case
///
/// Availability in the store is checked separately by the caller.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < ALIAS_MIN_LENGTH || alias.len() > ALIAS_MAX_LENGTH {
        return Err(AppError::bad_request(
            "Custom alias must be 3-20 characters",
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !ALIAS_PATTERN.is_match(alias) {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    if is_reserved(alias) {
        return Err(AppError::bad_request(
            "This alias is reserved and cannot be used.",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        assert_eq!(generate_code().len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_url_safe_characters() {
        for _ in 0..100 {
            let code = generate_code();
            assert!(ALIAS_PATTERN.is_match(&code), "unexpected code {code}");
        }
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_validate_boundary_lengths() {
        assert!(validate_alias("abc").is_ok());
        assert!(validate_alias(&"a".repeat(20)).is_ok());
    }

    #[test]
    fn test_validate_mixed_case_and_symbols() {
        assert!(validate_alias("My_Promo-2025").is_ok());
    }

    #[test]
    fn test_validate_too_short() {
        let err = validate_alias("ab").unwrap_err();
        assert!(err.to_string().contains("3-20 characters"));
    }

    #[test]
    fn test_validate_too_long() {
        assert!(validate_alias(&"a".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_special_characters() {
        assert!(validate_alias("my.code").is_err());
        assert!(validate_alias("my code").is_err());
        assert!(validate_alias("promo@1").is_err());
    }

    #[test]
    fn test_validate_all_reserved_aliases() {
        for &reserved in RESERVED_ALIASES {
            let err = validate_alias(reserved).unwrap_err();
            assert!(err.to_string().contains("reserved"), "{reserved}");
        }
    }

    #[test]
    fn test_reserved_check_ignores_case() {
        assert!(is_reserved("API"));
        assert!(is_reserved("Health"));
        assert!(validate_alias("ANALYTICS").is_err());
        assert!(!is_reserved("apis"));
    }
}
