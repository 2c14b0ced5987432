//! Unauthenticated HTTP sender and the response pipeline.

use tracing::{debug, info, instrument};
use url::Url;

use crate::classify::classify;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::normalize::Normalizer;
use crate::request::{Request, RequestBody};
use crate::response::{Response, ResponseBody};

/// HTTP client for the platform APIs.
///
/// [`dispatch`](Self::dispatch) sends a request and returns whatever came
/// back; [`complete`](Self::complete) turns that into either a normalized
/// success or a classified error. Credential strategies sit between the two.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
    normalizer: Normalizer,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        let normalizer = Normalizer::with_passthrough_prefixes(config.passthrough_prefixes.clone());

        Ok(Self {
            inner,
            config,
            normalizer,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the response normalizer.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Resolve the absolute URL of a request, query parameters included.
    pub fn url_for(&self, request: &Request) -> Result<Url> {
        let path = request.path();
        let joined = if path.starts_with('/') {
            format!("{}{}", self.config.host, path)
        } else {
            format!("{}/{}", self.config.host, path)
        };

        let mut url = Url::parse(&joined)?;
        if !request.query_params().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query_params());
        }
        Ok(url)
    }

    /// Send a request and read the response, whatever its status.
    #[instrument(skip(self, request), fields(method = ?request.method(), path = %request.path_only()))]
    pub async fn dispatch(&self, request: &Request) -> Result<Response> {
        let url = self.url_for(request)?;
        let mut req = self
            .inner
            .request(request.method().to_reqwest(), url)
            .header("X-User-Agent", self.config.user_agent.as_str());

        for (name, value) in &self.config.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        for (name, value) in request.headers() {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body() {
            req = match body {
                RequestBody::Json(value) => req.json(value),
                RequestBody::Bytes(bytes) => req.body(bytes.clone()),
            };
        }

        if self.config.enable_tracing {
            debug!(retried = request.is_retried(), "Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Response::read(response, request.expected_response()).await
    }

    /// Classify a failed response or normalize a successful one.
    pub fn complete(&self, request: &Request, response: Response) -> Result<Response> {
        if !response.is_success() {
            let status = response.status();
            let body = response.into_value().unwrap_or_default();
            return Err(classify(status, &body).into());
        }

        let path = request.path_only();
        Ok(response.map_body(|body| match body {
            ResponseBody::Json(value) => ResponseBody::Json(self.normalizer.normalize(path, value)),
            other => other,
        }))
    }

    /// Send a request without credentials and run the response pipeline.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let response = self.dispatch(&request).await?;
        self.complete(&request, response)
    }
}
