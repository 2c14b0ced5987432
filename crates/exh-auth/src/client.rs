//! Authenticated transport.

use std::sync::Arc;

use bytes::Bytes;
use exh_client::{
    ClientConfig, Error, ErrorKind, HttpClient, Request, Response, ResponseType, Result,
    USERS_BASE,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::config::AuthConfig;
use crate::credentials::TokenData;
use crate::grant::{AuthParams, MfaConfirmation};
use crate::oauth1::OAuth1Strategy;
use crate::oauth2::OAuth2Strategy;
use crate::proxy::ProxyStrategy;

/// Credential strategy, chosen once from the [`AuthConfig`].
#[derive(Debug)]
enum Strategy {
    OAuth1(OAuth1Strategy),
    OAuth2(OAuth2Strategy),
    Proxy(ProxyStrategy),
}

#[derive(Debug)]
struct Inner {
    http: HttpClient,
    strategy: Strategy,
}

/// HTTP client that attaches credentials to every request.
///
/// Cloning is cheap; clones share the same token state.
#[derive(Debug, Clone)]
pub struct AuthClient {
    inner: Arc<Inner>,
}

impl AuthClient {
    /// Bind an HTTP client to a credential strategy.
    pub fn new(http: HttpClient, auth: AuthConfig) -> Self {
        let strategy = match auth {
            AuthConfig::OAuth1(config) => Strategy::OAuth1(OAuth1Strategy::new(config)),
            AuthConfig::OAuth2(config) => Strategy::OAuth2(OAuth2Strategy::new(config)),
            AuthConfig::Proxy => Strategy::Proxy(ProxyStrategy::default()),
        };
        Self {
            inner: Arc::new(Inner { http, strategy }),
        }
    }

    /// Build the HTTP client from `config` and bind it.
    pub fn from_config(config: ClientConfig, auth: AuthConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::new(config)?, auth))
    }

    /// The unauthenticated HTTP client underneath.
    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    /// Name of the bound strategy: `oauth1`, `oauth2` or `proxy`.
    pub fn mode(&self) -> &'static str {
        match self.inner.strategy {
            Strategy::OAuth1(_) => "oauth1",
            Strategy::OAuth2(_) => "oauth2",
            Strategy::Proxy(_) => "proxy",
        }
    }

    /// Send a request with credentials attached.
    ///
    /// Successful JSON responses are normalized; failures are classified.
    /// OAuth2 requests rejected for a stale access token are retried once
    /// after a refresh.
    #[instrument(skip(self, request), fields(method = ?request.method(), path = %request.path_only()))]
    pub async fn send(&self, request: Request) -> Result<Response> {
        let http = &self.inner.http;
        match &self.inner.strategy {
            Strategy::OAuth1(s) => s.send(http, request).await,
            Strategy::OAuth2(s) => s.send(http, request).await,
            Strategy::Proxy(s) => s.send(http, request).await,
        }
    }

    /// GET `path` and deserialize the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: impl Into<String>) -> Result<T> {
        self.send(Request::get(path)).await?.json()
    }

    /// POST `body` as JSON to `path` and deserialize the response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<T> {
        self.send(Request::post(path).json(body)?).await?.json()
    }

    /// PUT `body` as JSON to `path` and deserialize the response.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<T> {
        self.send(Request::put(path).json(body)?).await?.json()
    }

    /// DELETE `path` and deserialize the JSON response.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: impl Into<String>) -> Result<T> {
        self.send(Request::delete(path)).await?.json()
    }

    /// GET `path` as raw bytes, without normalization.
    pub async fn get_bytes(&self, path: impl Into<String>) -> Result<Bytes> {
        self.send(Request::get(path).response_type(ResponseType::Bytes))
            .await?
            .bytes()
    }

    /// Obtain and store credentials.
    ///
    /// Failures are classified; an `mfa_required` failure carries the
    /// challenge to answer with [`confirm_mfa`](Self::confirm_mfa).
    pub async fn authenticate(&self, params: impl Into<AuthParams>) -> Result<TokenData> {
        let http = &self.inner.http;
        match (&self.inner.strategy, params.into()) {
            (Strategy::OAuth1(s), AuthParams::OAuth1(login)) => {
                s.authenticate(http, login).await.map(TokenData::OAuth1)
            }
            (Strategy::OAuth2(s), AuthParams::OAuth2(grant)) => {
                s.authenticate(http, grant).await.map(TokenData::OAuth2)
            }
            (Strategy::Proxy(_), _) => Err(proxy_unsupported("authenticate")),
            (_, params) => Err(Error::new(ErrorKind::InvalidInput(format!(
                "{} parameters do not match the {} client",
                match params {
                    AuthParams::OAuth1(_) => "oauth1",
                    AuthParams::OAuth2(_) => "oauth2",
                },
                self.mode()
            )))),
        }
    }

    /// Complete a pending MFA challenge and store the resulting credentials.
    pub async fn confirm_mfa(&self, mfa: MfaConfirmation) -> Result<TokenData> {
        let http = &self.inner.http;
        match &self.inner.strategy {
            Strategy::OAuth1(s) => s.confirm_mfa(http, mfa).await.map(TokenData::OAuth1),
            Strategy::OAuth2(s) => s.confirm_mfa(http, mfa).await.map(TokenData::OAuth2),
            Strategy::Proxy(_) => Err(proxy_unsupported("confirm_mfa")),
        }
    }

    /// Forget stored credentials. Always returns true.
    pub async fn logout(&self) -> bool {
        match &self.inner.strategy {
            Strategy::OAuth1(s) => s.logout().await,
            Strategy::OAuth2(s) => s.logout().await,
            Strategy::Proxy(s) => s.logout().await,
        }
    }

    /// Id of the authenticated user, or `None` if unknown.
    ///
    /// OAuth1 and proxy clients look it up once through `/users/v1/me`;
    /// lookup failures yield `None` instead of an error.
    pub async fn user_id(&self) -> Option<String> {
        let http = &self.inner.http;
        match &self.inner.strategy {
            Strategy::OAuth1(s) => s.user_id(http).await,
            Strategy::OAuth2(s) => s.user_id().await,
            Strategy::Proxy(s) => s.user_id(http).await,
        }
    }

    /// Currently stored token data.
    pub async fn token_data(&self) -> Option<TokenData> {
        match &self.inner.strategy {
            Strategy::OAuth1(s) => s.token().await.map(TokenData::OAuth1),
            Strategy::OAuth2(s) => s.tokens().await.map(TokenData::OAuth2),
            Strategy::Proxy(_) => None,
        }
    }
}

fn proxy_unsupported(operation: &str) -> Error {
    Error::new(ErrorKind::Unsupported(format!(
        "{operation} is handled upstream in proxy mode"
    )))
}

pub(crate) fn me_request() -> Request {
    Request::get(format!("{USERS_BASE}/me"))
}

/// Run a "who am I" request and extract the user id.
pub(crate) async fn fetch_user_id(http: &HttpClient, request: Request) -> Result<String> {
    let me = http.execute(request).await?.into_value()?;
    me.get("id")
        .and_then(|id| id.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::new(ErrorKind::Other("user response has no id".to_string())))
}
