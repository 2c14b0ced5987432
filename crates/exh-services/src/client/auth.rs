use exh_client::{Request, Result, AUTH_BASE};
use tracing::instrument;

use crate::auth::{Application, ApplicationCreation, MfaSetting, OAuth1Token};
use crate::common::{segment, AffectedRecords, PagedResult};

impl super::AuthService {
    /// List applications matching an RQL expression.
    #[instrument(skip(self))]
    pub async fn get_applications(&self, rql: &str) -> Result<PagedResult<Application>> {
        let request = Request::get(format!("{AUTH_BASE}/applications")).rql(rql);
        self.client.send(request).await?.json()
    }

    #[instrument(skip(self, application), fields(name = %application.name))]
    pub async fn create_application(
        &self,
        application: &ApplicationCreation,
    ) -> Result<Application> {
        self.client
            .post_json(format!("{AUTH_BASE}/applications"), application)
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove_application(&self, application_id: &str) -> Result<AffectedRecords> {
        self.client
            .delete_json(format!("{AUTH_BASE}/applications/{}", segment(application_id)))
            .await
    }

    /// List issued OAuth1 tokens matching an RQL expression.
    #[instrument(skip(self))]
    pub async fn get_tokens(&self, rql: &str) -> Result<PagedResult<OAuth1Token>> {
        let request = Request::get(format!("{AUTH_BASE}/oauth1/tokens")).rql(rql);
        self.client.send(request).await?.json()
    }

    /// Revoke an OAuth1 token.
    #[instrument(skip(self))]
    pub async fn remove_token(&self, token_id: &str) -> Result<AffectedRecords> {
        self.client
            .delete_json(format!("{AUTH_BASE}/oauth1/tokens/{}", segment(token_id)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_mfa_setting(&self, user_id: &str) -> Result<MfaSetting> {
        self.client
            .get_json(format!("{AUTH_BASE}/mfa/users/{}", segment(user_id)))
            .await
    }
}
