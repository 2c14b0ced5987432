//! Error types for exh-client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for SDK operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns the classified server error, if this is one.
    pub fn api(&self) -> Option<&ApiError> {
        match &self.kind {
            ErrorKind::Api(api) => Some(&**api),
            _ => None,
        }
    }

    /// Returns the classified server error kind, if this is one.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        self.api().map(|api| api.kind)
    }

    /// Returns true if the server rejected the request with the given kind.
    pub fn is(&self, kind: ApiErrorKind) -> bool {
        self.api_kind() == Some(kind)
    }

    /// Returns the HTTP status of a classified server error.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Api(api) => Some(api.status),
            ErrorKind::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::new(ErrorKind::Api(Box::new(err)))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The server answered with a non-2xx status.
    #[error("{0}")]
    Api(Box<ApiError>),

    /// HTTP transport failure that carried a status.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied input the operation cannot use.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operation is not available for the configured auth mode.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// OAuth1 request signing failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// A failed response, classified into the platform's error taxonomy.
///
/// `response` holds the raw error payload exactly as the server sent it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind:?} ({status}): {message}")]
pub struct ApiError {
    /// Classified error kind.
    pub kind: ApiErrorKind,
    /// HTTP status of the failed response.
    pub status: u16,
    /// Numeric error code reported by microservices.
    pub code: Option<i64>,
    /// Error name (`name` for microservices, `error` for the token endpoint).
    pub name: Option<String>,
    /// Human readable message, sanitized.
    pub message: String,
    /// Raw error payload.
    pub response: Value,
}

impl ApiError {
    /// Decode the MFA challenge embedded in an `mfa_required` response.
    pub fn mfa_challenge(&self) -> Option<MfaChallenge> {
        let mfa = self.response.get("mfa")?;
        serde_json::from_value(mfa.clone()).ok()
    }

    /// Returns the family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

/// Server-issued MFA challenge returned with an `mfa_required` error.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaChallenge {
    /// Challenge token to pass back when confirming.
    pub token: String,
    /// Lifetime of the challenge token in milliseconds.
    #[serde(default, alias = "token_expires_in")]
    pub token_expires_in: Option<u64>,
    /// Verification methods the user can complete the challenge with.
    #[serde(default)]
    pub methods: Vec<MfaMethod>,
}

impl std::fmt::Debug for MfaChallenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MfaChallenge")
            .field("token", &"[REDACTED]")
            .field("token_expires_in", &self.token_expires_in)
            .field("methods", &self.methods)
            .finish()
    }
}

/// A verification method offered in an MFA challenge.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MfaMethod {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub method_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Families of server errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Server,
    Validation,
    Permission,
    Resource,
    Authentication,
    Token,
    Mfa,
    OAuth2Grant,
    Account,
    ServiceSpecific,
    Generic,
}

/// Every error type the platform reports, plus the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    Server,
    NoPermission,
    EmptyBody,
    MissingRequiredFields,
    FieldFormat,
    ResourceUnknown,
    ResourceAlreadyExists,
    IllegalArgument,
    IllegalState,
    ApplicationNotAuthenticated,
    ApplicationUnknown,
    UserNotAuthenticated,
    Authentication,
    OauthKey,
    OauthToken,
    OauthSignature,
    DuplicateRequest,
    CallbackNotValid,
    UnsupportedResponseType,
    AccessTokenUnknown,
    AccessTokenExpired,
    MfaRequired,
    InvalidMfaCode,
    InvalidMfaToken,
    InvalidPresenceToken,
    NotEnoughMfaMethods,
    MfaReattemptDelay,
    EmailUnknown,
    EmailUsed,
    NotActivated,
    ActivationUnknown,
    AlreadyActivated,
    NewPasswordHashUnknown,
    Password,
    LoginTimeout,
    LoginFreeze,
    TooManyFailedAttempts,
    StatusInUse,
    LockedDocument,
    LocalizationKeyMissing,
    TemplateFilling,
    InvalidToken,
    UnauthorizedToken,
    TokenNotDeleteable,
    FileTooLarge,
    InvalidGrant,
    InvalidRequest,
    UnsupportedGrantType,
    InvalidClient,
    /// No table entry matched.
    Generic,
}

impl ApiErrorKind {
    /// Returns the family this kind belongs to.
    pub fn category(self) -> ErrorCategory {
        use ApiErrorKind::*;
        match self {
            Server => ErrorCategory::Server,
            EmptyBody | MissingRequiredFields | FieldFormat | IllegalArgument | IllegalState => {
                ErrorCategory::Validation
            }
            NoPermission | UserNotAuthenticated | ApplicationNotAuthenticated => {
                ErrorCategory::Permission
            }
            ResourceUnknown | ResourceAlreadyExists | LockedDocument | StatusInUse => {
                ErrorCategory::Resource
            }
            Authentication | LoginTimeout | LoginFreeze | TooManyFailedAttempts | Password => {
                ErrorCategory::Authentication
            }
            AccessTokenUnknown | AccessTokenExpired | OauthKey | OauthToken | OauthSignature
            | DuplicateRequest | ApplicationUnknown | CallbackNotValid
            | UnsupportedResponseType => ErrorCategory::Token,
            MfaRequired | InvalidMfaCode | InvalidMfaToken | InvalidPresenceToken
            | NotEnoughMfaMethods | MfaReattemptDelay => ErrorCategory::Mfa,
            InvalidGrant | InvalidRequest | UnsupportedGrantType | InvalidClient => {
                ErrorCategory::OAuth2Grant
            }
            EmailUnknown | EmailUsed | NotActivated | ActivationUnknown | AlreadyActivated
            | NewPasswordHashUnknown => ErrorCategory::Account,
            LocalizationKeyMissing | TemplateFilling | InvalidToken | UnauthorizedToken
            | TokenNotDeleteable | FileTooLarge => ErrorCategory::ServiceSpecific,
            Generic => ErrorCategory::Generic,
        }
    }

    /// Returns true for the two codes that trigger a token refresh.
    pub fn is_stale_access_token(self) -> bool {
        matches!(
            self,
            ApiErrorKind::AccessTokenExpired | ApiErrorKind::AccessTokenUnknown
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
