//! OAuth2 bearer tokens with refresh-and-retry.
//!
//! A request that fails with 400/401/403 and an expired or unknown access
//! token is retried exactly once after a refresh. Refreshes are serialized:
//! a request that waited on another refresh reuses its token.
//!
//! Every token request captures the logout epoch before it is sent; tokens
//! that arrive after a `logout` are discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use exh_client::{Error, ErrorKind, HttpClient, Request, Response, Result};
use serde_json::{json, Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument, warn};

use crate::config::OAuth2Config;
use crate::credentials::OAuth2TokenData;
use crate::grant::{MfaConfirmation, OAuth2Grant};

/// OAuth2 credential strategy.
#[derive(Debug)]
pub(crate) struct OAuth2Strategy {
    config: OAuth2Config,
    tokens: RwLock<Option<OAuth2TokenData>>,
    refresh_gate: Mutex<()>,
    logout_epoch: AtomicU64,
}

impl OAuth2Strategy {
    pub(crate) fn new(config: OAuth2Config) -> Self {
        Self {
            config,
            tokens: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            logout_epoch: AtomicU64::new(0),
        }
    }

    /// Attach the current access token. Returns the token used, if any.
    async fn attach(&self, request: &mut Request) -> Option<String> {
        let access_token = self
            .tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
            .filter(|t| !t.is_empty())?;
        request.set_header("Authorization", format!("Bearer {access_token}"));
        Some(access_token)
    }

    pub(crate) async fn send(&self, http: &HttpClient, mut request: Request) -> Result<Response> {
        let sent_with = self.attach(&mut request).await;
        let response = http.dispatch(&request).await?;

        let err = match http.complete(&request, response) {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        if !should_refresh(&err, &request) {
            return Err(err);
        }

        request.mark_retried();
        warn!(
            status = ?err.status(),
            kind = ?err.api_kind(),
            path = %request.path_only(),
            "Access token rejected, refreshing"
        );

        let access_token = self.refresh_after(http, sent_with.as_deref(), err).await?;
        request.set_header("Authorization", format!("Bearer {access_token}"));
        http.execute(request).await
    }

    /// Refresh unless another request already replaced `stale` while we waited.
    async fn refresh_after(
        &self,
        http: &HttpClient,
        stale: Option<&str>,
        original: Error,
    ) -> Result<String> {
        let _gate = self.refresh_gate.lock().await;

        let epoch = self.logout_epoch.load(Ordering::SeqCst);
        let refresh_token = {
            let tokens = self.tokens.read().await;
            let Some(current) = tokens.as_ref() else {
                return Err(original);
            };
            if !current.access_token.is_empty() && Some(current.access_token.as_str()) != stale {
                debug!("Reusing access token from concurrent refresh");
                return Ok(current.access_token.clone());
            }
            match current.refresh_token.clone() {
                Some(refresh_token) => refresh_token,
                None => return Err(original),
            }
        };

        // The stale token stays attached to concurrent requests until the refresh settles.
        let fields = OAuth2Grant::refresh_token(refresh_token).body_fields();
        match self.request_tokens(http, fields, epoch).await {
            Ok(Some(data)) => Ok(data.access_token),
            Ok(None) => {
                debug!("Logged out during refresh, dropping new tokens");
                Err(original)
            }
            Err(err) => {
                warn!(kind = ?err.api_kind(), "Token refresh failed");
                let mut tokens = self.tokens.write().await;
                if self.logout_epoch.load(Ordering::SeqCst) == epoch {
                    if let Some(tokens) = tokens.as_mut() {
                        tokens.access_token.clear();
                    }
                }
                Err(err)
            }
        }
    }

    #[instrument(skip(self, http, grant), fields(grant_type = grant.grant_type()))]
    pub(crate) async fn authenticate(
        &self,
        http: &HttpClient,
        grant: OAuth2Grant,
    ) -> Result<OAuth2TokenData> {
        let epoch = self.logout_epoch.load(Ordering::SeqCst);
        self.request_tokens(http, grant.body_fields(), epoch)
            .await?
            .ok_or_else(logged_out)
    }

    #[instrument(skip(self, http, mfa))]
    pub(crate) async fn confirm_mfa(
        &self,
        http: &HttpClient,
        mfa: MfaConfirmation,
    ) -> Result<OAuth2TokenData> {
        let mut fields = Map::new();
        fields.insert("grant_type".into(), json!("mfa"));
        fields.insert("token".into(), json!(mfa.token));
        fields.insert("code".into(), json!(mfa.code));
        fields.insert("method_id".into(), json!(mfa.method_id));
        let epoch = self.logout_epoch.load(Ordering::SeqCst);
        self.request_tokens(http, fields, epoch)
            .await?
            .ok_or_else(logged_out)
    }

    /// POST to the token endpoint with client credentials and store the result.
    ///
    /// Returns `None` when `logout` ran after `epoch` was captured; nothing is
    /// stored and the callback does not fire.
    async fn request_tokens(
        &self,
        http: &HttpClient,
        mut fields: Map<String, Value>,
        epoch: u64,
    ) -> Result<Option<OAuth2TokenData>> {
        let mut request = Request::post(&self.config.token_path);
        match self.config.client_secret() {
            Some(secret) => {
                let credentials = STANDARD.encode(format!("{}:{}", self.config.client_id, secret));
                request.set_header("Authorization", format!("Basic {credentials}"));
            }
            None => {
                fields.insert("client_id".into(), json!(self.config.client_id));
            }
        }

        let response = http.execute(request.json_value(Value::Object(fields))).await?;
        let data = response.json::<OAuth2TokenData>()?.stamp_expiry(Utc::now());

        let mut tokens = self.tokens.write().await;
        if self.logout_epoch.load(Ordering::SeqCst) != epoch {
            return Ok(None);
        }
        *tokens = Some(data.clone());
        drop(tokens);

        if let Some(callback) = self.config.fresh_tokens_callback() {
            callback(&data);
        }
        debug!(user_id = ?data.user_id, expires_at = ?data.expires_at, "OAuth2 tokens stored");
        Ok(Some(data))
    }

    pub(crate) async fn logout(&self) -> bool {
        let mut tokens = self.tokens.write().await;
        self.logout_epoch.fetch_add(1, Ordering::SeqCst);
        *tokens = None;
        true
    }

    pub(crate) async fn user_id(&self) -> Option<String> {
        self.tokens.read().await.as_ref()?.user_id.clone()
    }

    pub(crate) async fn tokens(&self) -> Option<OAuth2TokenData> {
        self.tokens.read().await.clone()
    }
}

fn logged_out() -> Error {
    Error::new(ErrorKind::Other(
        "logged out before the token request completed".to_string(),
    ))
}

fn should_refresh(err: &Error, request: &Request) -> bool {
    !request.is_retried()
        && matches!(err.status(), Some(400 | 401 | 403))
        && err.api_kind().is_some_and(|kind| kind.is_stale_access_token())
}
