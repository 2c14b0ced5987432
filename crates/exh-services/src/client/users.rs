use exh_client::{Request, Result, USERS_BASE};
use tracing::instrument;

use crate::common::{segment, AffectedRecords, PagedResult};
use crate::users::{User, UserUpdate};

impl super::UsersService {
    /// Health check. Sent without credentials.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<bool> {
        let response = self
            .client
            .http()
            .execute(Request::get(format!("{USERS_BASE}/health")))
            .await?;
        Ok(response.status() == 200)
    }

    /// The currently authenticated user.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User> {
        self.client.get_json(format!("{USERS_BASE}/me")).await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, user_id: &str) -> Result<User> {
        self.client
            .get_json(format!("{USERS_BASE}/{}", segment(user_id)))
            .await
    }

    /// Update a user, returning the number of records changed.
    #[instrument(skip(self, update))]
    pub async fn update(&self, user_id: &str, update: &UserUpdate) -> Result<AffectedRecords> {
        self.client
            .put_json(format!("{USERS_BASE}/{}", segment(user_id)), update)
            .await
    }

    /// List users matching an RQL expression.
    #[instrument(skip(self))]
    pub async fn find(&self, rql: &str) -> Result<PagedResult<User>> {
        let request = Request::get(format!("{USERS_BASE}/")).rql(rql);
        self.client.send(request).await?.json()
    }

    /// Delete every user matching an RQL expression.
    #[instrument(skip(self))]
    pub async fn remove_users(&self, rql: &str) -> Result<AffectedRecords> {
        let request = Request::delete(format!("{USERS_BASE}/")).rql(rql);
        self.client.send(request).await?.json()
    }

    /// Delete a single user.
    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: &str) -> Result<AffectedRecords> {
        self.client
            .delete_json(format!("{USERS_BASE}/{}", segment(user_id)))
            .await
    }
}
