//! Auth service administration models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered OAuth application.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub application_type: ApplicationType,
    #[serde(default)]
    pub versions: Vec<ApplicationVersion>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub confidential: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_timestamp: Option<DateTime<Utc>>,
}

/// Which OAuth flavour an application uses.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    OAuth1,
    OAuth2,
}

/// A version of an application, with the credentials issued for it.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationVersion {
    pub id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for ApplicationVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationVersion")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &self.consumer_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Payload for registering an application.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCreation {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub application_type: ApplicationType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub redirect_uris: Vec<String>,
    pub confidential: bool,
}

impl ApplicationCreation {
    pub fn new(name: impl Into<String>, application_type: ApplicationType) -> Self {
        Self {
            name: name.into(),
            description: None,
            application_type,
            redirect_uris: Vec::new(),
            confidential: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.push(uri.into());
        self
    }

    pub fn confidential(mut self, confidential: bool) -> Self {
        self.confidential = confidential;
        self
    }
}

/// An issued OAuth1 token (the secret is never returned by listings).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OAuth1Token {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_timestamp: Option<DateTime<Utc>>,
}

/// A user's multi-factor settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MfaSetting {
    pub id: String,
    #[serde(default)]
    pub methods: Vec<exh_client::MfaMethod>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_application_deserialize() {
        let app: Application = serde_json::from_value(json!({
            "id": "app-1",
            "name": "Portal",
            "type": "oauth2",
            "confidential": true,
            "redirectUris": ["https://portal.example.com/cb"],
            "versions": [{"id": "v1", "version": "1.0.0", "clientId": "cid", "clientSecret": "shh"}]
        }))
        .unwrap();
        assert_eq!(app.application_type, ApplicationType::OAuth2);
        assert_eq!(app.versions[0].client_id.as_deref(), Some("cid"));
        assert!(!format!("{:?}", app.versions[0]).contains("shh"));
    }

    #[test]
    fn test_application_creation_body() {
        let body = ApplicationCreation::new("Portal", ApplicationType::OAuth1).description("web");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"name": "Portal", "description": "web", "type": "oauth1", "confidential": false})
        );
    }

    #[test]
    fn test_mfa_setting() {
        let setting: MfaSetting = serde_json::from_value(json!({
            "id": "u1",
            "enabled": true,
            "methods": [{"id": "m1", "type": "totp", "name": "phone", "tags": []}]
        }))
        .unwrap();
        assert!(setting.enabled);
        assert_eq!(setting.methods[0].id, "m1");
    }
}
