//! Inputs to `authenticate` and `confirm_mfa`.

use serde_json::{json, Map, Value};

use crate::credentials::OAuth1TokenData;

/// An OAuth2 grant exchanged at the token endpoint.
#[derive(Clone)]
pub enum OAuth2Grant {
    Password {
        username: String,
        password: String,
    },
    AuthorizationCode {
        code: String,
        redirect_uri: Option<String>,
    },
    RefreshToken {
        refresh_token: String,
    },
}

impl std::fmt::Debug for OAuth2Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OAuth2Grant::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            OAuth2Grant::AuthorizationCode { redirect_uri, .. } => f
                .debug_struct("AuthorizationCode")
                .field("code", &"[REDACTED]")
                .field("redirect_uri", redirect_uri)
                .finish(),
            OAuth2Grant::RefreshToken { .. } => f
                .debug_struct("RefreshToken")
                .field("refresh_token", &"[REDACTED]")
                .finish(),
        }
    }
}

impl OAuth2Grant {
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        OAuth2Grant::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn authorization_code(code: impl Into<String>) -> Self {
        OAuth2Grant::AuthorizationCode {
            code: code.into(),
            redirect_uri: None,
        }
    }

    pub fn refresh_token(refresh_token: impl Into<String>) -> Self {
        OAuth2Grant::RefreshToken {
            refresh_token: refresh_token.into(),
        }
    }

    /// Attach a redirect URI to an authorization code grant. No-op for other grants.
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        if let OAuth2Grant::AuthorizationCode { redirect_uri, .. } = &mut self {
            *redirect_uri = Some(uri.into());
        }
        self
    }

    pub fn grant_type(&self) -> &'static str {
        match self {
            OAuth2Grant::Password { .. } => "password",
            OAuth2Grant::AuthorizationCode { .. } => "authorization_code",
            OAuth2Grant::RefreshToken { .. } => "refresh_token",
        }
    }

    /// Grant-specific body fields, `grant_type` included.
    pub(crate) fn body_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("grant_type".into(), json!(self.grant_type()));
        match self {
            OAuth2Grant::Password { username, password } => {
                fields.insert("username".into(), json!(username));
                fields.insert("password".into(), json!(password));
            }
            OAuth2Grant::AuthorizationCode { code, redirect_uri } => {
                fields.insert("code".into(), json!(code));
                if let Some(uri) = redirect_uri {
                    fields.insert("redirect_uri".into(), json!(uri));
                }
            }
            OAuth2Grant::RefreshToken { refresh_token } => {
                fields.insert("refresh_token".into(), json!(refresh_token));
            }
        }
        fields
    }
}

/// How an OAuth1 client obtains its token pair.
#[derive(Clone)]
pub enum OAuth1Login {
    /// Exchange user credentials at the token endpoint.
    Password { email: String, password: String },
    /// Use an existing token pair, validated against `/users/v1/me` unless skipped.
    Token {
        token_data: OAuth1TokenData,
        skip_token_check: bool,
    },
}

impl std::fmt::Debug for OAuth1Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OAuth1Login::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            OAuth1Login::Token {
                token_data,
                skip_token_check,
            } => f
                .debug_struct("Token")
                .field("token_data", token_data)
                .field("skip_token_check", skip_token_check)
                .finish(),
        }
    }
}

impl OAuth1Login {
    pub fn password(email: impl Into<String>, password: impl Into<String>) -> Self {
        OAuth1Login::Password {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn token(key: impl Into<String>, secret: impl Into<String>) -> Self {
        OAuth1Login::Token {
            token_data: OAuth1TokenData::new(key, secret),
            skip_token_check: false,
        }
    }

    /// Skip the `/users/v1/me` validation call for a token login.
    pub fn skip_token_check(mut self, skip: bool) -> Self {
        if let OAuth1Login::Token {
            skip_token_check, ..
        } = &mut self
        {
            *skip_token_check = skip;
        }
        self
    }
}

/// Parameters for `authenticate`, matching the configured strategy.
#[derive(Debug, Clone)]
pub enum AuthParams {
    OAuth1(OAuth1Login),
    OAuth2(OAuth2Grant),
}

impl From<OAuth1Login> for AuthParams {
    fn from(login: OAuth1Login) -> Self {
        AuthParams::OAuth1(login)
    }
}

impl From<OAuth2Grant> for AuthParams {
    fn from(grant: OAuth2Grant) -> Self {
        AuthParams::OAuth2(grant)
    }
}

/// Answer to an MFA challenge.
#[derive(Clone)]
pub struct MfaConfirmation {
    /// Challenge token from the `mfa_required` error.
    pub token: String,
    /// Id of the verification method used.
    pub method_id: String,
    pub code: String,
}

impl std::fmt::Debug for MfaConfirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MfaConfirmation")
            .field("token", &"[REDACTED]")
            .field("method_id", &self.method_id)
            .field("code", &"[REDACTED]")
            .finish()
    }
}

impl MfaConfirmation {
    pub fn new(
        token: impl Into<String>,
        method_id: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            method_id: method_id.into(),
            code: code.into(),
        }
    }
}
