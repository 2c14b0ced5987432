//! OAuth2 flows through the facade.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use exh_sdk::{ApiErrorKind, AuthConfig, MfaConfirmation, OAuth2Config, OAuth2Grant};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_for, error_body, me_body, token_body, ME, OAUTH2_TOKENS, USER_ID};

#[tokio::test]
async fn test_login_then_read_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OAUTH2_TOKENS))
        .and(body_partial_json(json!({
            "grant_type": "password",
            "username": "jane@example.com",
            "client_id": "portal"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-1", "refresh-1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("Authorization", "Bearer access-1"))
        .and(header("X-Request-Service", "integration-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AuthConfig::oauth2("portal"));
    let tokens = client
        .authenticate(OAuth2Grant::password("jane@example.com", "secret"))
        .await
        .unwrap();
    assert_eq!(tokens.user_id(), Some(USER_ID));
    assert_eq!(client.user_id().await.as_deref(), Some(USER_ID));

    let me = client.users().me().await.unwrap();
    assert_eq!(me.first_name.as_deref(), Some("Jane"));
    assert!(me.creation_timestamp.is_some());
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once_across_services() {
    let server = MockServer::start().await;
    let refreshed = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path(OAUTH2_TOKENS))
        .and(body_partial_json(json!({"grant_type": "password"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-1", "refresh-1")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(OAUTH2_TOKENS))
        .and(body_partial_json(json!({
            "grant_type": "refresh_token",
            "refresh_token": "refresh-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-2", "refresh-2")))
        .expect(1)
        .mount(&server)
        .await;

    // The stale token is rejected everywhere; the fresh one is accepted.
    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_body(118, "ACCESS_TOKEN_EXPIRED_EXCEPTION")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/v1/schema-1/documents"))
        .and(header("Authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": {"total": 0, "offset": 0, "limit": 25},
            "data": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("Authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .mount(&server)
        .await;

    let counter = refreshed.clone();
    let config = OAuth2Config::new("portal").with_fresh_tokens_callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let client = client_for(&server, AuthConfig::OAuth2(config));
    client
        .authenticate(OAuth2Grant::password("jane@example.com", "secret"))
        .await
        .unwrap();

    let page = client
        .data()
        .find_documents::<serde_json::Map<String, serde_json::Value>>("schema-1", "")
        .await
        .unwrap();
    assert_eq!(page.page.total, 0);

    // Other facades see the refreshed token without another refresh.
    client.users().me().await.unwrap();
    assert_eq!(refreshed.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_refresh_surfaces_grant_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OAUTH2_TOKENS))
        .and(body_partial_json(json!({"grant_type": "password"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-1", "refresh-1")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(OAUTH2_TOKENS))
        .and(body_partial_json(json!({"grant_type": "refresh_token"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Refresh token is revoked"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_body(118, "ACCESS_TOKEN_EXPIRED_EXCEPTION")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AuthConfig::oauth2("portal"));
    client
        .authenticate(OAuth2Grant::password("jane@example.com", "secret"))
        .await
        .unwrap();

    let err = client.users().me().await.unwrap_err();
    assert!(err.is(ApiErrorKind::InvalidGrant));
    assert!(err.to_string().contains("Refresh token is revoked"));
}

#[tokio::test]
async fn test_mfa_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OAUTH2_TOKENS))
        .and(body_partial_json(json!({"grant_type": "password"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "mfa_required",
            "error_description": "Multi-factor authentication is required",
            "mfa": {
                "token": "mfa-token",
                "tokenExpiresIn": 300000,
                "methods": [{"id": "method-1", "type": "totp", "name": "Phone", "tags": []}]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(OAUTH2_TOKENS))
        .and(body_partial_json(json!({
            "grant_type": "mfa",
            "token": "mfa-token",
            "method_id": "method-1",
            "code": "123456"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-mfa", "refresh-1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AuthConfig::oauth2("portal"));
    let err = client
        .authenticate(OAuth2Grant::password("jane@example.com", "secret"))
        .await
        .unwrap_err();
    assert!(err.is(ApiErrorKind::MfaRequired));

    let challenge = err.api().and_then(|api| api.mfa_challenge()).unwrap();
    assert_eq!(challenge.methods[0].id, "method-1");

    let tokens = client
        .confirm_mfa(MfaConfirmation::new(
            challenge.token,
            challenge.methods[0].id.clone(),
            "123456",
        ))
        .await
        .unwrap();
    assert_eq!(tokens.as_oauth2().unwrap().access_token, "access-mfa");
}

#[tokio::test]
async fn test_logout_forgets_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OAUTH2_TOKENS))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-1", "refresh-1")))
        .mount(&server)
        .await;

    let client = client_for(&server, AuthConfig::oauth2("portal"));
    client
        .authenticate(OAuth2Grant::password("jane@example.com", "secret"))
        .await
        .unwrap();
    assert!(client.logout().await);
    assert!(client.user_id().await.is_none());
    assert!(client.raw().token_data().await.is_none());
}
