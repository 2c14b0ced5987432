//! Top-level client assembling the transport and the service facades.

use exh_auth::{AuthClient, AuthConfig, AuthParams, MfaConfirmation, TokenData};
use exh_client::{ClientConfig, HttpClient, Result};
use exh_services::{AuthService, DataService, FilesService, UsersService};

/// Entry point to the platform.
///
/// The credential strategy is chosen once, from the [`AuthConfig`] variant.
/// All service facades share one transport, so a login or token refresh is
/// seen by every one of them.
#[derive(Debug, Clone)]
pub struct Client {
    transport: AuthClient,
    users: UsersService,
    data: DataService,
    files: FilesService,
    auth: AuthService,
}

impl Client {
    pub fn new(config: ClientConfig, auth: AuthConfig) -> Result<Self> {
        Ok(Self::from_transport(AuthClient::new(
            HttpClient::new(config)?,
            auth,
        )))
    }

    /// Build from environment: `EXH_HOST` plus whichever credentials are set.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?, AuthConfig::from_env()?)
    }

    pub fn from_transport(transport: AuthClient) -> Self {
        Self {
            users: UsersService::new(transport.clone()),
            data: DataService::new(transport.clone()),
            files: FilesService::new(transport.clone()),
            auth: AuthService::new(transport.clone()),
            transport,
        }
    }

    pub async fn authenticate(&self, params: impl Into<AuthParams>) -> Result<TokenData> {
        self.transport.authenticate(params).await
    }

    pub async fn confirm_mfa(&self, mfa: MfaConfirmation) -> Result<TokenData> {
        self.transport.confirm_mfa(mfa).await
    }

    /// Forget stored credentials.
    pub async fn logout(&self) -> bool {
        self.transport.logout().await
    }

    /// Id of the authenticated user, if known.
    pub async fn user_id(&self) -> Option<String> {
        self.transport.user_id().await
    }

    /// The authenticated transport, for endpoints without a facade.
    pub fn raw(&self) -> &AuthClient {
        &self.transport
    }

    pub fn users(&self) -> &UsersService {
        &self.users
    }

    pub fn data(&self) -> &DataService {
        &self.data
    }

    pub fn files(&self) -> &FilesService {
        &self.files
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}
