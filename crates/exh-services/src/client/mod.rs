//! Service facades.
//!
//! Each facade is a thin wrapper over [`AuthClient`]: it builds a path, a
//! method and an optional body, and hands the request to the transport.
//! Clones share the transport and its credentials.

use exh_auth::AuthClient;

mod auth;
mod data;
mod files;
mod schemas;
mod users;

macro_rules! facade {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            client: AuthClient,
        }

        impl $name {
            pub fn new(client: AuthClient) -> Self {
                Self { client }
            }

            /// The authenticated transport underneath.
            pub fn inner(&self) -> &AuthClient {
                &self.client
            }
        }
    };
}

facade!(
    /// User accounts (`/users/v1`).
    UsersService
);
facade!(
    /// Schema-bound documents (`/data/v1`).
    DataService
);
facade!(
    /// Uploaded files (`/files/v1`).
    FilesService
);
facade!(
    /// Applications, OAuth1 tokens and MFA settings (`/auth/v2`).
    AuthService
);
