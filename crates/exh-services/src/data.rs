//! Data service documents.
//!
//! Document payloads live under the data base path, so their keys are
//! returned exactly as stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document. `T` is the user-defined `data` payload.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document<T = Map<String, Value>> {
    pub id: String,
    #[serde(default)]
    pub user_ids: Vec<String>,
    #[serde(default)]
    pub group_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_lock: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_changed_timestamp: Option<DateTime<Utc>>,
}

/// A data schema: document shape, statuses and workflow transitions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub statuses: Map<String, Value>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_sync_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_timestamp: Option<DateTime<Utc>>,
}

impl Schema {
    /// Id of the transition with the given name.
    pub fn transition_id(&self, name: &str) -> Option<&str> {
        self.transitions
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.id.as_str())
    }
}

/// A workflow transition between document statuses.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub from_statuses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_status: Option<String>,
    /// Conditions, actions and other transition settings.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for creating a schema, and for updating one with only some fields set.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_sync_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_limit: Option<u64>,
}

impl SchemaInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn create_mode(mut self, mode: impl Into<String>) -> Self {
        self.create_mode = Some(mode.into());
        self
    }

    pub fn read_mode(mut self, mode: impl Into<String>) -> Self {
        self.read_mode = Some(mode.into());
        self
    }

    pub fn update_mode(mut self, mode: impl Into<String>) -> Self {
        self.update_mode = Some(mode.into());
        self
    }

    pub fn delete_mode(mut self, mode: impl Into<String>) -> Self {
        self.delete_mode = Some(mode.into());
        self
    }

    pub fn limits(mut self, default_limit: u64, maximum_limit: u64) -> Self {
        self.default_limit = Some(default_limit);
        self.maximum_limit = Some(maximum_limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reading {
        heart_rate: u32,
    }

    #[test]
    fn test_document_with_typed_data() {
        let doc: Document<Reading> = serde_json::from_value(json!({
            "id": "d1",
            "userIds": ["u1"],
            "groupIds": [],
            "status": "open",
            "data": {"heart_rate": 72},
            "creatorId": "u1",
            "updateTimestamp": "2021-04-22T14:29:45.586Z"
        }))
        .unwrap();

        assert_eq!(doc.data, Reading { heart_rate: 72 });
        assert_eq!(doc.user_ids, vec!["u1"]);
        assert!(doc.update_timestamp.is_some());
    }

    #[test]
    fn test_document_default_payload_keeps_keys() {
        let doc: Document = serde_json::from_value(json!({
            "id": "d1",
            "data": {"snake_key": 1, "Mixed-Key": 2}
        }))
        .unwrap();
        assert!(doc.data.contains_key("snake_key"));
        assert!(doc.data.contains_key("Mixed-Key"));
    }

    #[test]
    fn test_schema_transition_lookup() {
        let schema: Schema = serde_json::from_value(json!({
            "id": "s1",
            "name": "vitals",
            "statuses": {"open": {}, "closed": {}},
            "transitions": [
                {"id": "t1", "name": "close", "fromStatuses": ["open"], "toStatus": "closed"},
                {"id": "t2", "name": "reopen", "fromStatuses": ["closed"], "toStatus": "open"}
            ]
        }))
        .unwrap();
        assert_eq!(schema.transition_id("reopen"), Some("t2"));
        assert_eq!(schema.transition_id("archive"), None);
        assert_eq!(schema.transitions[0].from_statuses, vec!["open"]);
    }

    #[test]
    fn test_schema_input_skips_unset() {
        let input = SchemaInput::new("vitals", "Daily readings").limits(20, 100);
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "name": "vitals",
                "description": "Daily readings",
                "defaultLimit": 20,
                "maximumLimit": 100
            })
        );
    }
}
