//! Log in, answer an MFA challenge if one is raised, and print the profile.
//!
//! ```text
//! EXH_HOST=https://api.example.com EXH_CLIENT_ID=portal \
//! EXH_USERNAME=jane@example.com EXH_PASSWORD=secret [EXH_MFA_CODE=123456] \
//!   cargo run --example login
//! ```

use exh_sdk::{ApiErrorKind, Client, MfaConfirmation, OAuth2Grant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(name).map_err(|_| format!("{name} is not set").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = Client::from_env()?;
    let grant = OAuth2Grant::password(required("EXH_USERNAME")?, required("EXH_PASSWORD")?);

    match client.authenticate(grant).await {
        Ok(_) => info!("logged in"),
        Err(err) if err.is(ApiErrorKind::MfaRequired) => {
            let challenge = err
                .api()
                .and_then(|api| api.mfa_challenge())
                .ok_or("MFA required but no challenge returned")?;
            let method = challenge.methods.first().ok_or("no MFA methods offered")?;
            warn!(method = %method.id, "MFA required");

            client
                .confirm_mfa(MfaConfirmation::new(
                    challenge.token.clone(),
                    method.id.clone(),
                    required("EXH_MFA_CODE")?,
                ))
                .await?;
            info!("logged in with MFA");
        }
        Err(err) => return Err(err.into()),
    }

    let me = client.users().me().await?;
    println!(
        "{} {} <{}>",
        me.first_name.unwrap_or_default(),
        me.last_name.unwrap_or_default(),
        me.email.unwrap_or_default()
    );

    client.logout().await;
    Ok(())
}
