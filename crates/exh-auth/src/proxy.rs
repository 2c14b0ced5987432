//! Proxy mode: credentials are injected upstream of this client.

use exh_client::{HttpClient, Request, Response, Result};
use tokio::sync::RwLock;

use crate::client::{fetch_user_id, me_request};

#[derive(Debug, Default)]
pub(crate) struct ProxyStrategy {
    user_id: RwLock<Option<String>>,
}

impl ProxyStrategy {
    pub(crate) async fn send(&self, http: &HttpClient, request: Request) -> Result<Response> {
        http.execute(request).await
    }

    pub(crate) async fn logout(&self) -> bool {
        *self.user_id.write().await = None;
        true
    }

    /// Cached user id, looked up once through `/users/v1/me`. Lookup failures yield `None`.
    pub(crate) async fn user_id(&self, http: &HttpClient) -> Option<String> {
        if let Some(id) = self.user_id.read().await.clone() {
            return Some(id);
        }

        let id = fetch_user_id(http, me_request()).await.ok()?;
        *self.user_id.write().await = Some(id.clone());
        Some(id)
    }
}
