//! Shared helpers for integration tests.

use exh_sdk::{AuthConfig, Client, ClientConfig};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const OAUTH2_TOKENS: &str = "/auth/v2/oauth2/tokens";
pub const OAUTH1_TOKENS: &str = "/auth/v2/oauth1/tokens";
pub const ME: &str = "/users/v1/me";
pub const USER_ID: &str = "5a0b2adc265ced65a8cab861";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exh_client=debug,exh_auth=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn client_for(server: &MockServer, auth: AuthConfig) -> Client {
    init_tracing();
    let config = ClientConfig::builder(server.uri())
        .with_header("X-Request-Service", "integration-tests")
        .with_tracing(true)
        .build()
        .unwrap();
    Client::new(config, auth).unwrap()
}

pub fn token_body(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": 300,
        "token_type": "bearer",
        "user_id": USER_ID,
        "application_id": "5a0b2adc265ced65a8cab862"
    })
}

pub fn me_body() -> Value {
    json!({
        "id": USER_ID,
        "email": "jane@example.com",
        "first_name": "Jane",
        "last_name": "Doe",
        "creation_timestamp": 1_619_101_785_586_i64
    })
}

pub fn error_body(code: i64, name: &str) -> Value {
    json!({"code": code, "name": name, "message": format!("{name} raised")})
}
