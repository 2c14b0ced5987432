//! OAuth1 flows through the facade.

use exh_sdk::{ApiErrorKind, AuthConfig, OAuth1Login};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::common::{client_for, error_body, me_body, ME, OAUTH1_TOKENS, USER_ID};

fn signed_with(token: &'static str) -> impl Fn(&Request) -> bool {
    move |req: &Request| {
        req.headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| {
                value.starts_with("OAuth ")
                    && value.contains(r#"oauth_consumer_key="consumer-key""#)
                    && value.contains(r#"oauth_signature_method="HMAC-SHA1""#)
                    && value.contains(&format!(r#"oauth_token="{token}""#))
            })
    }
}

#[tokio::test]
async fn test_password_login_then_signed_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OAUTH1_TOKENS))
        .and(body_json(json!({"email": "jane@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "token-id",
            "token": "user-token",
            "token_secret": "user-secret",
            "user_id": USER_ID,
            "application_id": "app-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/v1/file-token/file"))
        .and(signed_with("user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AuthConfig::oauth1("consumer-key", "consumer-secret"));
    let tokens = client
        .authenticate(OAuth1Login::password("jane@example.com", "secret"))
        .await
        .unwrap();
    let oauth1 = tokens.as_oauth1().unwrap();
    assert_eq!(oauth1.key, "user-token");
    assert_eq!(oauth1.token_id.as_deref(), Some("token-id"));

    assert_eq!(client.user_id().await.as_deref(), Some(USER_ID));

    let bytes = client.files().retrieve("file-token").await.unwrap();
    assert_eq!(bytes.as_ref(), b"%PDF");
}

#[tokio::test]
async fn test_token_login_is_validated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(signed_with("stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AuthConfig::oauth1("consumer-key", "consumer-secret"));
    let tokens = client
        .authenticate(OAuth1Login::token("stored-token", "stored-secret"))
        .await
        .unwrap();
    assert_eq!(tokens.user_id(), Some(USER_ID));
}

#[tokio::test]
async fn test_expired_token_is_not_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/v1/u2"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_body(118, "ACCESS_TOKEN_EXPIRED_EXCEPTION")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AuthConfig::oauth1("consumer-key", "consumer-secret"));
    client
        .authenticate(OAuth1Login::token("stored-token", "stored-secret").skip_token_check(true))
        .await
        .unwrap();

    let err = client.users().find_by_id("u2").await.unwrap_err();
    assert!(err.is(ApiErrorKind::AccessTokenExpired));
}
