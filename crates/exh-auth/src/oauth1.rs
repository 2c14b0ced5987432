//! OAuth1 (HMAC-SHA1) request signing.
//!
//! Every request is signed with the consumer credentials and, once
//! authenticated, the stored token pair. OAuth1 tokens do not expire
//! silently, so there is no refresh path: failures go straight to the
//! caller.

use base64::{engine::general_purpose::STANDARD, Engine};
use exh_client::{Error, ErrorKind, HttpClient, Request, Response, Result};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha1::Sha1;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use url::Url;

use crate::client::{fetch_user_id, me_request};
use crate::config::OAuth1Config;
use crate::credentials::{OAuth1TokenData, OAuth1TokenResponse};
use crate::grant::{MfaConfirmation, OAuth1Login};

type HmacSha1 = Hmac<Sha1>;

/// Produces OAuth1 `Authorization` headers for a consumer.
#[derive(Clone)]
pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: String,
}

impl std::fmt::Debug for OAuth1Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1Signer")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

impl OAuth1Signer {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Build the `Authorization` header for a request with a fresh nonce and timestamp.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &Url,
        token: Option<&OAuth1TokenData>,
    ) -> Result<String> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.header_with(method, url, token, &nonce, &timestamp)
    }

    pub(crate) fn header_with(
        &self,
        method: &str,
        url: &Url,
        token: Option<&OAuth1TokenData>,
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let mut oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_version", "1.0"),
        ];
        if let Some(token) = token {
            oauth_params.push(("oauth_token", token.key.as_str()));
        }

        let signature = self.signature(method, url, &oauth_params, token)?;
        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort();

        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {fields}"))
    }

    fn signature(
        &self,
        method: &str,
        url: &Url,
        oauth_params: &[(&str, &str)],
        token: Option<&OAuth1TokenData>,
    ) -> Result<String> {
        let base = base_string(method, url, oauth_params);
        let key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(token.map(|t| t.secret.as_str()).unwrap_or_default())
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| Error::new(ErrorKind::Signing(e.to_string())))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// `METHOD&base-url&normalized-params`, every component percent-encoded.
fn base_string(method: &str, url: &Url, oauth_params: &[(&str, &str)]) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
        .collect();
    params.sort();

    let normalized = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    let base_url = format!(
        "{}://{}{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default().to_ascii_lowercase(),
        port,
        url.path()
    );

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(&base_url),
        encode(&normalized)
    )
}

/// OAuth1 credential strategy.
#[derive(Debug)]
pub(crate) struct OAuth1Strategy {
    config: OAuth1Config,
    signer: OAuth1Signer,
    token: RwLock<Option<OAuth1TokenData>>,
}

impl OAuth1Strategy {
    pub(crate) fn new(config: OAuth1Config) -> Self {
        let signer = OAuth1Signer::new(config.consumer_key.clone(), config.consumer_secret());
        Self {
            config,
            signer,
            token: RwLock::new(None),
        }
    }

    fn sign(
        &self,
        http: &HttpClient,
        request: &mut Request,
        token: Option<&OAuth1TokenData>,
    ) -> Result<()> {
        let url = http.url_for(request)?;
        let header = self
            .signer
            .authorization_header(request.method().as_str(), &url, token)?;
        request.set_header("Authorization", header);
        Ok(())
    }

    pub(crate) async fn send(&self, http: &HttpClient, mut request: Request) -> Result<Response> {
        {
            let token = self.token.read().await;
            self.sign(http, &mut request, token.as_ref())?;
        }
        http.execute(request).await
    }

    #[instrument(skip(self, http, login))]
    pub(crate) async fn authenticate(
        &self,
        http: &HttpClient,
        login: OAuth1Login,
    ) -> Result<OAuth1TokenData> {
        let data = match login {
            OAuth1Login::Token {
                token_data,
                skip_token_check: true,
            } => token_data,
            OAuth1Login::Token {
                mut token_data,
                skip_token_check: false,
            } => {
                let mut request = me_request();
                self.sign(http, &mut request, Some(&token_data))?;
                token_data.user_id = Some(fetch_user_id(http, request).await?);
                token_data
            }
            OAuth1Login::Password { email, password } => {
                let request =
                    Request::post(&self.config.token_path).json_value(json!({
                        "email": email,
                        "password": password,
                    }));
                self.request_tokens(http, request).await?
            }
        };

        debug!(user_id = ?data.user_id, "OAuth1 token stored");
        *self.token.write().await = Some(data.clone());
        Ok(data)
    }

    #[instrument(skip(self, http, mfa))]
    pub(crate) async fn confirm_mfa(
        &self,
        http: &HttpClient,
        mfa: MfaConfirmation,
    ) -> Result<OAuth1TokenData> {
        let request = Request::post(format!("{}/mfa", self.config.token_path)).json_value(json!({
            "token": mfa.token,
            "code": mfa.code,
            "methodId": mfa.method_id,
        }));
        let data = self.request_tokens(http, request).await?;
        *self.token.write().await = Some(data.clone());
        Ok(data)
    }

    /// Token endpoint calls are signed with the consumer only.
    async fn request_tokens(
        &self,
        http: &HttpClient,
        mut request: Request,
    ) -> Result<OAuth1TokenData> {
        self.sign(http, &mut request, None)?;
        let resp: OAuth1TokenResponse = http.execute(request).await?.json()?;
        Ok(resp.into())
    }

    pub(crate) async fn logout(&self) -> bool {
        *self.token.write().await = None;
        true
    }

    /// Cached user id, looked up once through `/users/v1/me`. Lookup failures yield `None`.
    pub(crate) async fn user_id(&self, http: &HttpClient) -> Option<String> {
        let token = self.token.read().await.clone()?;
        if token.user_id.is_some() {
            return token.user_id;
        }

        let mut request = me_request();
        self.sign(http, &mut request, Some(&token)).ok()?;
        let user_id = fetch_user_id(http, request).await.ok()?;

        if let Some(stored) = self.token.write().await.as_mut() {
            if stored.key == token.key {
                stored.user_id = Some(user_id.clone());
            }
        }
        Some(user_id)
    }

    pub(crate) async fn token(&self) -> Option<OAuth1TokenData> {
        self.token.read().await.clone()
    }
}
