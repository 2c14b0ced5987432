//! Redaction of credentials from server-provided error text.

use std::sync::LazyLock;

use regex_lite::Regex;

const MAX_LENGTH: usize = 500;

static BEARER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)bearer\s+[A-Za-z0-9._~+/-]+=*").ok());

static SECRET_FIELD_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"(access_token|refresh_token|token_secret|tokenSecret|client_secret|password|oauth_signature)(["']?\s*[:=]\s*["']?)[^"'&,\s}]+"#,
    )
    .ok()
});

/// Sanitize an error message to prevent exposing sensitive data.
///
/// Bearer tokens and secret-looking `key=value` pairs are redacted and
/// messages longer than 500 bytes are truncated on a char boundary.
pub(crate) fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = message.to_string();

    if let Some(pattern) = BEARER_PATTERN.as_ref() {
        sanitized = pattern
            .replace_all(&sanitized, "Bearer [REDACTED]")
            .to_string();
    }

    if let Some(pattern) = SECRET_FIELD_PATTERN.as_ref() {
        sanitized = pattern
            .replace_all(&sanitized, "${1}${2}[REDACTED]")
            .to_string();
    }

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
