//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{Error, ErrorKind, Result};

/// Environment variable holding the platform host.
pub const HOST_ENV: &str = "EXH_HOST";

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Platform host, without a trailing slash.
    pub host: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Pool idle timeout.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Value of the `X-User-Agent` header.
    pub user_agent: String,
    /// Headers added to every request.
    pub headers: Vec<(String, String)>,
    /// Path prefixes whose response keys are not camelized.
    pub passthrough_prefixes: Vec<String>,
    /// Whether to enable request/response tracing.
    pub enable_tracing: bool,
}

impl ClientConfig {
    /// Create a new client config builder for `host`.
    pub fn builder(host: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: ClientConfig {
                host: host.into(),
                timeout: Duration::from_secs(30),
                connect_timeout: Duration::from_secs(10),
                pool_idle_timeout: Duration::from_secs(90),
                pool_max_idle_per_host: 10,
                user_agent: crate::USER_AGENT.to_string(),
                headers: Vec::new(),
                passthrough_prefixes: vec![crate::DATA_BASE.to_string()],
                enable_tracing: true,
            },
        }
    }

    /// Build a default configuration from `EXH_HOST`.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var(HOST_ENV).map_err(|_| {
            Error::new(ErrorKind::Config(format!("{HOST_ENV} is not set")))
        })?;
        Self::builder(host).build()
    }
}

/// Builder for ClientConfig.
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set pool idle timeout.
    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Set custom `X-User-Agent`.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the pass-through path prefixes.
    pub fn with_passthrough_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.config.passthrough_prefixes = prefixes;
        self
    }

    /// Enable or disable request/response tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Validate and build the client configuration.
    pub fn build(mut self) -> Result<ClientConfig> {
        let host = self.config.host.trim().trim_end_matches('/').to_string();
        if host.is_empty() {
            return Err(Error::new(ErrorKind::Config("host is empty".into())));
        }

        let url = Url::parse(&host)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::new(ErrorKind::Config(format!(
                "host must use http or https, got {}",
                url.scheme()
            ))));
        }

        self.config.host = host;
        Ok(self.config)
    }
}
