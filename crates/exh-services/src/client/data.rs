use exh_client::{Request, Result, DATA_BASE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use crate::common::{segment, AffectedRecords, PagedResult};
use crate::data::Document;

fn documents_path(schema_id: &str) -> String {
    format!("{DATA_BASE}/{}/documents", segment(schema_id))
}

fn document_path(schema_id: &str, document_id: &str) -> String {
    format!("{}/{}", documents_path(schema_id), segment(document_id))
}

impl super::DataService {
    /// Create a document in a schema. `body` is sent as-is.
    #[instrument(skip(self, body))]
    pub async fn create_document<B, T>(&self, schema_id: &str, body: &B) -> Result<Document<T>>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.client.post_json(documents_path(schema_id), body).await
    }

    /// List documents of a schema matching an RQL expression.
    #[instrument(skip(self))]
    pub async fn find_documents<T: DeserializeOwned>(
        &self,
        schema_id: &str,
        rql: &str,
    ) -> Result<PagedResult<Document<T>>> {
        let request = Request::get(documents_path(schema_id)).rql(rql);
        self.client.send(request).await?.json()
    }

    /// Update a document. A non-empty `rql` acts as a precondition.
    #[instrument(skip(self, body))]
    pub async fn update_document<B: Serialize>(
        &self,
        schema_id: &str,
        document_id: &str,
        body: &B,
        rql: &str,
    ) -> Result<AffectedRecords> {
        let request = Request::put(document_path(schema_id, document_id))
            .rql(rql)
            .json(body)?;
        self.client.send(request).await?.json()
    }

    #[instrument(skip(self))]
    pub async fn delete_document(
        &self,
        schema_id: &str,
        document_id: &str,
    ) -> Result<AffectedRecords> {
        self.client
            .delete_json(document_path(schema_id, document_id))
            .await
    }

    /// Remove the named fields from a document's data.
    #[instrument(skip(self, fields))]
    pub async fn delete_fields(
        &self,
        schema_id: &str,
        document_id: &str,
        fields: &[&str],
    ) -> Result<AffectedRecords> {
        let path = format!("{}/deleteFields", document_path(schema_id, document_id));
        self.client.post_json(path, &json!({ "fields": fields })).await
    }

    /// Grant the given groups access to a document.
    #[instrument(skip(self, group_ids))]
    pub async fn link_groups(
        &self,
        schema_id: &str,
        document_id: &str,
        group_ids: &[&str],
    ) -> Result<AffectedRecords> {
        self.post_link(schema_id, document_id, "linkGroups", json!({ "groupIds": group_ids }))
            .await
    }

    #[instrument(skip(self, group_ids))]
    pub async fn unlink_groups(
        &self,
        schema_id: &str,
        document_id: &str,
        group_ids: &[&str],
    ) -> Result<AffectedRecords> {
        self.post_link(schema_id, document_id, "unlinkGroups", json!({ "groupIds": group_ids }))
            .await
    }

    /// Grant the given users access to a document.
    #[instrument(skip(self, user_ids))]
    pub async fn link_users(
        &self,
        schema_id: &str,
        document_id: &str,
        user_ids: &[&str],
    ) -> Result<AffectedRecords> {
        self.post_link(schema_id, document_id, "linkUsers", json!({ "userIds": user_ids }))
            .await
    }

    #[instrument(skip(self, user_ids))]
    pub async fn unlink_users(
        &self,
        schema_id: &str,
        document_id: &str,
        user_ids: &[&str],
    ) -> Result<AffectedRecords> {
        self.post_link(schema_id, document_id, "unlinkUsers", json!({ "userIds": user_ids }))
            .await
    }

    async fn post_link(
        &self,
        schema_id: &str,
        document_id: &str,
        action: &str,
        body: serde_json::Value,
    ) -> Result<AffectedRecords> {
        let path = format!("{}/{action}", document_path(schema_id, document_id));
        self.client.post_json(path, &body).await
    }

    /// Run a workflow transition, optionally with extra data.
    #[instrument(skip(self, data))]
    pub async fn transition_document(
        &self,
        schema_id: &str,
        document_id: &str,
        transition_id: &str,
        data: Option<serde_json::Value>,
    ) -> Result<AffectedRecords> {
        let path = format!("{}/transition", document_path(schema_id, document_id));
        let mut body = json!({ "id": transition_id });
        if let Some(data) = data {
            body["data"] = data;
        }
        self.client.post_json(path, &body).await
    }
}
