//! Mapping of failed responses onto [`ApiErrorKind`].
//!
//! Lookup order: the numeric `code` field first, then the OAuth2 `error`
//! string, then the generic fallback.

use serde_json::Value;

use crate::error::{ApiError, ApiErrorKind};
use crate::sanitize::sanitize_error_message;

/// Numeric error codes reported by microservices.
const CODE_TABLE: &[(i64, ApiErrorKind)] = &[
    (1, ApiErrorKind::Server),
    (10, ApiErrorKind::NoPermission),
    (13, ApiErrorKind::EmptyBody),
    (14, ApiErrorKind::MissingRequiredFields),
    (15, ApiErrorKind::FieldFormat),
    (16, ApiErrorKind::ResourceUnknown),
    (17, ApiErrorKind::ResourceAlreadyExists),
    (26, ApiErrorKind::IllegalArgument),
    (27, ApiErrorKind::IllegalState),
    (101, ApiErrorKind::ApplicationNotAuthenticated),
    (103, ApiErrorKind::ApplicationUnknown),
    (104, ApiErrorKind::UserNotAuthenticated),
    (106, ApiErrorKind::Authentication),
    (107, ApiErrorKind::OauthKey),
    (108, ApiErrorKind::OauthToken),
    (109, ApiErrorKind::OauthSignature),
    (110, ApiErrorKind::DuplicateRequest),
    (113, ApiErrorKind::CallbackNotValid),
    (114, ApiErrorKind::UnsupportedResponseType),
    (117, ApiErrorKind::AccessTokenUnknown),
    (118, ApiErrorKind::AccessTokenExpired),
    (129, ApiErrorKind::MfaRequired),
    (130, ApiErrorKind::InvalidMfaCode),
    (131, ApiErrorKind::InvalidMfaToken),
    (132, ApiErrorKind::InvalidPresenceToken),
    (133, ApiErrorKind::NotEnoughMfaMethods),
    (134, ApiErrorKind::MfaReattemptDelay),
    (202, ApiErrorKind::EmailUnknown),
    (203, ApiErrorKind::EmailUsed),
    (204, ApiErrorKind::NotActivated),
    (205, ApiErrorKind::ActivationUnknown),
    (206, ApiErrorKind::AlreadyActivated),
    (207, ApiErrorKind::NewPasswordHashUnknown),
    (208, ApiErrorKind::Password),
    (211, ApiErrorKind::LoginTimeout),
    (212, ApiErrorKind::LoginFreeze),
    (213, ApiErrorKind::TooManyFailedAttempts),
    (414, ApiErrorKind::StatusInUse),
    (415, ApiErrorKind::LockedDocument),
    (1002, ApiErrorKind::LocalizationKeyMissing),
    (1003, ApiErrorKind::TemplateFilling),
    (2605, ApiErrorKind::InvalidToken),
    (2606, ApiErrorKind::UnauthorizedToken),
    (2607, ApiErrorKind::TokenNotDeleteable),
    (2610, ApiErrorKind::FileTooLarge),
];

/// OAuth2 `error` strings returned by the token endpoint.
const ERROR_TABLE: &[(&str, ApiErrorKind)] = &[
    ("invalid_grant", ApiErrorKind::InvalidGrant),
    ("invalid_request", ApiErrorKind::InvalidRequest),
    ("unsupported_grant_type", ApiErrorKind::UnsupportedGrantType),
    ("mfa_required", ApiErrorKind::MfaRequired),
    ("invalid_client", ApiErrorKind::InvalidClient),
];

/// Look up a numeric error code.
pub fn kind_for_code(code: i64) -> Option<ApiErrorKind> {
    CODE_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, kind)| *kind)
}

/// Look up an OAuth2 `error` string.
pub fn kind_for_error(error: &str) -> Option<ApiErrorKind> {
    ERROR_TABLE
        .iter()
        .find(|(e, _)| *e == error)
        .map(|(_, kind)| *kind)
}

/// Classify a failed response from its status and decoded body.
///
/// Non-JSON bodies should be passed as a `Value::String` so the text
/// survives into the message.
pub fn classify(status: u16, body: &Value) -> ApiError {
    let code = body.get("code").and_then(as_code);
    let error = body.get("error").and_then(Value::as_str);

    let kind = code
        .and_then(kind_for_code)
        .or_else(|| error.and_then(kind_for_error))
        .unwrap_or(ApiErrorKind::Generic);

    let name = body
        .get("name")
        .and_then(Value::as_str)
        .or(error)
        .map(str::to_string);

    let message = ["message", "error_description", "description"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .or_else(|| body.as_str())
        .or(error)
        .map(sanitize_error_message)
        .unwrap_or_else(|| format!("Request failed with status {status}"));

    ApiError {
        kind,
        status,
        code,
        name,
        message,
        response: body.clone(),
    }
}

// Some services send the code as a numeric string.
fn as_code(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_code_maps_to_its_kind() {
        let expected = [
            (1, ApiErrorKind::Server),
            (10, ApiErrorKind::NoPermission),
            (13, ApiErrorKind::EmptyBody),
            (14, ApiErrorKind::MissingRequiredFields),
            (15, ApiErrorKind::FieldFormat),
            (16, ApiErrorKind::ResourceUnknown),
            (17, ApiErrorKind::ResourceAlreadyExists),
            (26, ApiErrorKind::IllegalArgument),
            (27, ApiErrorKind::IllegalState),
            (101, ApiErrorKind::ApplicationNotAuthenticated),
            (103, ApiErrorKind::ApplicationUnknown),
            (104, ApiErrorKind::UserNotAuthenticated),
            (106, ApiErrorKind::Authentication),
            (107, ApiErrorKind::OauthKey),
            (108, ApiErrorKind::OauthToken),
            (109, ApiErrorKind::OauthSignature),
            (110, ApiErrorKind::DuplicateRequest),
            (113, ApiErrorKind::CallbackNotValid),
            (114, ApiErrorKind::UnsupportedResponseType),
            (117, ApiErrorKind::AccessTokenUnknown),
            (118, ApiErrorKind::AccessTokenExpired),
            (129, ApiErrorKind::MfaRequired),
            (130, ApiErrorKind::InvalidMfaCode),
            (131, ApiErrorKind::InvalidMfaToken),
            (132, ApiErrorKind::InvalidPresenceToken),
            (133, ApiErrorKind::NotEnoughMfaMethods),
            (134, ApiErrorKind::MfaReattemptDelay),
            (202, ApiErrorKind::EmailUnknown),
            (203, ApiErrorKind::EmailUsed),
            (204, ApiErrorKind::NotActivated),
            (205, ApiErrorKind::ActivationUnknown),
            (206, ApiErrorKind::AlreadyActivated),
            (207, ApiErrorKind::NewPasswordHashUnknown),
            (208, ApiErrorKind::Password),
            (211, ApiErrorKind::LoginTimeout),
            (212, ApiErrorKind::LoginFreeze),
            (213, ApiErrorKind::TooManyFailedAttempts),
            (414, ApiErrorKind::StatusInUse),
            (415, ApiErrorKind::LockedDocument),
            (1002, ApiErrorKind::LocalizationKeyMissing),
            (1003, ApiErrorKind::TemplateFilling),
            (2605, ApiErrorKind::InvalidToken),
            (2606, ApiErrorKind::UnauthorizedToken),
            (2607, ApiErrorKind::TokenNotDeleteable),
            (2610, ApiErrorKind::FileTooLarge),
        ];

        for (code, kind) in expected {
            assert_eq!(kind_for_code(code), Some(kind), "code {code}");
            assert_eq!(classify(400, &json!({"code": code})).kind, kind, "code {code}");
        }

        let mut kinds: Vec<_> = expected.iter().map(|(_, kind)| format!("{kind:?}")).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), expected.len());
        assert_eq!(CODE_TABLE.len(), expected.len());
        assert_eq!(kind_for_code(999), None);
    }

    #[test]
    fn test_every_error_string_maps_to_its_kind() {
        let expected = [
            ("invalid_grant", ApiErrorKind::InvalidGrant),
            ("invalid_request", ApiErrorKind::InvalidRequest),
            ("unsupported_grant_type", ApiErrorKind::UnsupportedGrantType),
            ("mfa_required", ApiErrorKind::MfaRequired),
            ("invalid_client", ApiErrorKind::InvalidClient),
        ];

        for (error, kind) in expected {
            assert_eq!(kind_for_error(error), Some(kind), "{error}");
            assert_eq!(classify(400, &json!({"error": error})).kind, kind, "{error}");
        }
        assert_eq!(ERROR_TABLE.len(), expected.len());
        assert_eq!(kind_for_error("access_denied"), None);
    }

    #[test]
    fn test_classify_by_code() {
        let err = classify(
            401,
            &json!({
                "code": 118,
                "name": "ACCESS_TOKEN_EXPIRED_EXCEPTION",
                "message": "The access token has expired"
            }),
        );
        assert_eq!(err.kind, ApiErrorKind::AccessTokenExpired);
        assert_eq!(err.status, 401);
        assert_eq!(err.code, Some(118));
        assert_eq!(err.name.as_deref(), Some("ACCESS_TOKEN_EXPIRED_EXCEPTION"));
        assert_eq!(err.message, "The access token has expired");
    }

    #[test]
    fn test_classify_by_error_string() {
        let err = classify(
            400,
            &json!({
                "error": "invalid_grant",
                "error_description": "Invalid credentials"
            }),
        );
        assert_eq!(err.kind, ApiErrorKind::InvalidGrant);
        assert_eq!(err.name.as_deref(), Some("invalid_grant"));
        assert_eq!(err.message, "Invalid credentials");
    }

    #[test]
    fn test_code_takes_precedence_over_error_string() {
        let err = classify(400, &json!({"code": 16, "error": "invalid_grant"}));
        assert_eq!(err.kind, ApiErrorKind::ResourceUnknown);
    }

    #[test]
    fn test_unknown_code_falls_through_to_error_string() {
        let err = classify(400, &json!({"code": 9999, "error": "mfa_required"}));
        assert_eq!(err.kind, ApiErrorKind::MfaRequired);
        assert_eq!(err.code, Some(9999));
    }

    #[test]
    fn test_generic_fallback() {
        let err = classify(500, &json!({"code": 9999, "message": "boom"}));
        assert_eq!(err.kind, ApiErrorKind::Generic);
        assert_eq!(err.message, "boom");

        let err = classify(502, &Value::Null);
        assert_eq!(err.kind, ApiErrorKind::Generic);
        assert_eq!(err.message, "Request failed with status 502");
    }

    #[test]
    fn test_plain_text_body() {
        let err = classify(503, &Value::String("Service Unavailable".into()));
        assert_eq!(err.kind, ApiErrorKind::Generic);
        assert_eq!(err.message, "Service Unavailable");
        assert_eq!(err.response, json!("Service Unavailable"));
    }

    #[test]
    fn test_string_code() {
        let err = classify(404, &json!({"code": "16"}));
        assert_eq!(err.kind, ApiErrorKind::ResourceUnknown);
    }

    #[test]
    fn test_raw_payload_preserved() {
        let body = json!({
            "code": 14,
            "message": "Missing fields",
            "missing_fields": ["email"]
        });
        let err = classify(400, &body);
        assert_eq!(err.kind, ApiErrorKind::MissingRequiredFields);
        assert_eq!(err.response, body);
    }
}
