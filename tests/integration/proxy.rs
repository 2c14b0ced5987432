//! Proxy mode through the facade.

use exh_sdk::{AuthConfig, ErrorKind, OAuth2Grant};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_for, me_body, ME, USER_ID};

#[tokio::test]
async fn test_requests_pass_through_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/v1/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v2/mfa/users/u1"))
        .and(header("X-Request-Service", "integration-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "enabled": false,
            "methods": [],
            "update_timestamp": "2021-04-22T14:29:45Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AuthConfig::Proxy);
    assert!(client.users().health().await.unwrap());

    let setting = client.auth().get_mfa_setting("u1").await.unwrap();
    assert!(!setting.enabled);

    for request in server.received_requests().await.unwrap() {
        assert!(request.headers.get("authorization").is_none());
    }

    // Looked up once, then cached.
    assert_eq!(client.user_id().await.as_deref(), Some(USER_ID));
    assert_eq!(client.user_id().await.as_deref(), Some(USER_ID));
}

#[tokio::test]
async fn test_authenticate_is_unsupported() {
    let server = MockServer::start().await;
    let client = client_for(&server, AuthConfig::Proxy);

    let err = client
        .authenticate(OAuth2Grant::password("jane@example.com", "secret"))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Unsupported(_)));
}
