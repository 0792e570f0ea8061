//! Destination URL validation.
//!
//! URLs are checked, never rewritten: the stored destination is byte-for-byte
//! what the client submitted.

use url::Url;

use crate::error::AppError;
use serde_json::json;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UrlValidationError {
    #[error("Invalid URL format.")]
    InvalidFormat(String),

    #[error("Invalid URL protocol. Only HTTP and HTTPS are allowed.")]
    UnsupportedProtocol(String),
}

impl From<UrlValidationError> for AppError {
    fn from(e: UrlValidationError) -> Self {
        let details = match &e {
            UrlValidationError::InvalidFormat(reason) => json!({ "reason": reason }),
            UrlValidationError::UnsupportedProtocol(scheme) => json!({ "protocol": scheme }),
        };
        AppError::bad_request(e.to_string(), details)
    }
}

/// Checks that `input` is an absolute `http` or `https` URL.
///
/// Rejects `javascript:`, `data:`, `file:`, `ftp:` and every other scheme.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] if the string does not parse.
/// Returns [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    // The raw string is later sent back as a Location header.
    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "control characters are not allowed".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(UrlValidationError::UnsupportedProtocol(other.to_string())),
    }
}
