use exh_client::{Request, Result, DATA_BASE};
use tracing::instrument;

use crate::common::{segment, AffectedRecords, PagedResult};
use crate::data::{Schema, SchemaInput};

fn schema_path(schema_id: &str) -> String {
    format!("{DATA_BASE}/{}", segment(schema_id))
}

impl super::DataService {
    #[instrument(skip(self, schema))]
    pub async fn create_schema(&self, schema: &SchemaInput) -> Result<Schema> {
        self.client.post_json(format!("{DATA_BASE}/"), schema).await
    }

    /// List schemas matching an RQL expression.
    #[instrument(skip(self))]
    pub async fn find_schemas(&self, rql: &str) -> Result<PagedResult<Schema>> {
        let request = Request::get(format!("{DATA_BASE}/")).rql(rql);
        self.client.send(request).await?.json()
    }

    #[instrument(skip(self))]
    pub async fn find_schema_by_id(&self, schema_id: &str) -> Result<Option<Schema>> {
        let rql = format!("eq(id,{})", segment(schema_id));
        Ok(self.find_schemas(&rql).await?.data.into_iter().next())
    }

    #[instrument(skip(self))]
    pub async fn find_schema_by_name(&self, name: &str) -> Result<Option<Schema>> {
        let rql = format!("eq(name,{})", segment(name));
        Ok(self.find_schemas(&rql).await?.data.into_iter().next())
    }

    /// Update name, description or limits of a schema.
    #[instrument(skip(self, update))]
    pub async fn update_schema(
        &self,
        schema_id: &str,
        update: &SchemaInput,
    ) -> Result<AffectedRecords> {
        self.client.put_json(schema_path(schema_id), update).await
    }

    #[instrument(skip(self))]
    pub async fn remove_schema(&self, schema_id: &str) -> Result<AffectedRecords> {
        self.client.delete_json(schema_path(schema_id)).await
    }

    /// Stop accepting new documents for a schema.
    #[instrument(skip(self))]
    pub async fn disable_schema(&self, schema_id: &str) -> Result<AffectedRecords> {
        let request = Request::post(format!("{}/disable", schema_path(schema_id)));
        self.client.send(request).await?.json()
    }

    #[instrument(skip(self))]
    pub async fn enable_schema(&self, schema_id: &str) -> Result<AffectedRecords> {
        let request = Request::post(format!("{}/enable", schema_path(schema_id)));
        self.client.send(request).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{proxy_client, raw_query};
    use super::super::DataService;
    use crate::data::SchemaInput;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_schema() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/data/v1/"))
            .and(body_json(json!({
                "name": "vitals",
                "description": "Daily readings",
                "readMode": "allUsers"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "s1",
                "name": "vitals",
                "description": "Daily readings",
                "readMode": "allUsers",
                "properties": {"heart_rate": {"type": "number"}},
                "creationTimestamp": 1_619_101_785_586_i64
            })))
            .expect(1)
            .mount(&server)
            .await;

        let schema = DataService::new(proxy_client(&server))
            .create_schema(&SchemaInput::new("vitals", "Daily readings").read_mode("allUsers"))
            .await
            .unwrap();
        assert_eq!(schema.id, "s1");
        assert!(schema.properties.contains_key("heart_rate"));
        assert!(schema.creation_timestamp.is_some());
    }

    #[tokio::test]
    async fn test_find_schema_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/v1/"))
            .and(raw_query("eq(name,vitals)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": {"total": 1, "offset": 0, "limit": 25},
                "data": [{"id": "s1", "name": "vitals"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/v1/"))
            .and(raw_query("eq(name,missing)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": {"total": 0, "offset": 0, "limit": 25},
                "data": []
            })))
            .mount(&server)
            .await;

        let data = DataService::new(proxy_client(&server));
        let schema = data.find_schema_by_name("vitals").await.unwrap().unwrap();
        assert_eq!(schema.id, "s1");
        assert!(data.find_schema_by_name("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disable_and_enable_schema() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/data/v1/s1/disable"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"affectedRecords": 1})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/data/v1/s1/enable"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"affectedRecords": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let data = DataService::new(proxy_client(&server));
        assert_eq!(data.disable_schema("s1").await.unwrap().affected_records, 1);
        assert_eq!(data.enable_schema("s1").await.unwrap().affected_records, 1);
    }

    #[tokio::test]
    async fn test_update_and_remove_schema() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/data/v1/s1"))
            .and(body_json(json!({"defaultLimit": 10, "maximumLimit": 50})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"affectedRecords": 1})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/data/v1/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"affectedRecords": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let data = DataService::new(proxy_client(&server));
        let update = SchemaInput::default().limits(10, 50);
        assert_eq!(data.update_schema("s1", &update).await.unwrap().affected_records, 1);
        assert_eq!(data.remove_schema("s1").await.unwrap().affected_records, 1);
    }
}
