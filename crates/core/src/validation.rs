//! Input validation and sanitization
//!
//! Two independent stages guard every piece of caller text:
//!
//! - [`validate`] rejects obviously hostile input early with a
//!   caller-visible error. It is a denylist and never mutates the text.
//! - [`sanitize`] strips everything outside a small allowlist right before
//!   the text is interpolated into an OS command or toast markup.
//!
//! The denylist is a best-effort filter. The sanitizer is the boundary.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::ValidationError;

/// Maximum accepted length of a title, message or voice id, in characters
pub const MAX_TEXT_LENGTH: usize = 500;

/// Shell metacharacters: ; & | > < ` $ ( ) { } [ ] \
static SHELL_METACHARACTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[;&|><`$(){}\[\]\\]").expect("valid regex"));

static PATH_TRAVERSAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\./").expect("valid regex"));

static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<script").expect("valid regex"));

/// Everything the sanitizer removes
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s.,!?\-']").expect("valid regex"));

/// Validate an arbitrary JSON value as caller text for `field`
///
/// Fails with `TypeMismatch` for non-strings and the empty string,
/// `TooLong` above [`MAX_TEXT_LENGTH`] characters and `UnsafeContent` when
/// a denylisted pattern matches. Returns the original string on success.
pub fn validate<'a>(input: &'a Value, field: &'static str) -> Result<&'a str, ValidationError> {
    match input {
        Value::String(text) => validate_str(text, field),
        _ => Err(ValidationError::TypeMismatch { field }),
    }
}

/// Validate a string that is already known to be text
pub fn validate_str<'a>(text: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::TypeMismatch { field });
    }

    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LENGTH,
        });
    }

    let unsafe_content = [&*SHELL_METACHARACTERS, &*PATH_TRAVERSAL, &*SCRIPT_TAG]
        .iter()
        .any(|pattern| pattern.is_match(text));
    if unsafe_content {
        tracing::debug!(field, "Rejected input matching denylist");
        return Err(ValidationError::UnsafeContent { field });
    }

    Ok(text)
}

/// Reduce text to the interpolation-safe alphabet
///
/// Keeps ASCII letters, digits, whitespace and `. , ! ? - '`, trims the
/// result and truncates it to [`MAX_TEXT_LENGTH`] characters.
pub fn sanitize(text: &str) -> String {
    let stripped = DISALLOWED.replace_all(text, "");
    stripped.trim().chars().take(MAX_TEXT_LENGTH).collect()
}
