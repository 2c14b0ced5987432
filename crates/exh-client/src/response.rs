//! Buffered HTTP responses.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};
use crate::request::ResponseType;

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// JSON payload. Non-JSON text is carried as a `Value::String`.
    Json(Value),
    /// Raw bytes, for [`ResponseType::Bytes`] requests.
    Bytes(Bytes),
    /// No body.
    Empty,
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: ResponseBody,
}

impl Response {
    /// Create a response from already decoded parts. Header names are lower-cased.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: ResponseBody) -> Self {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
            body,
        }
    }

    /// Read a reqwest response to completion.
    pub(crate) async fn read(
        resp: reqwest::Response,
        response_type: ResponseType,
    ) -> Result<Self> {
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();

        let raw = resp.bytes().await?;
        let success = (200..300).contains(&status);
        let body = if raw.is_empty() {
            ResponseBody::Empty
        } else if success && response_type == ResponseType::Bytes {
            ResponseBody::Bytes(raw)
        } else {
            match serde_json::from_slice::<Value>(&raw) {
                Ok(value) => ResponseBody::Json(value),
                Err(_) => ResponseBody::Json(Value::String(
                    String::from_utf8_lossy(&raw).into_owned(),
                )),
            }
        };

        Ok(Self::new(status, headers, body))
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value. Lookup is case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Borrow the JSON payload, if any.
    pub fn value(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Take the JSON payload, `Null` for empty bodies.
    pub fn into_value(self) -> Result<Value> {
        match self.body {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Empty => Ok(Value::Null),
            ResponseBody::Bytes(_) => Err(Error::new(ErrorKind::Json(
                "response was read as bytes".to_string(),
            ))),
        }
    }

    /// Deserialize the JSON payload.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.into_value()?)?)
    }

    /// Take the payload as bytes.
    pub fn bytes(self) -> Result<Bytes> {
        match self.body {
            ResponseBody::Bytes(bytes) => Ok(bytes),
            ResponseBody::Empty => Ok(Bytes::new()),
            ResponseBody::Json(value) => Ok(Bytes::from(serde_json::to_vec(&value)?)),
        }
    }

    pub(crate) fn map_body(self, f: impl FnOnce(ResponseBody) -> ResponseBody) -> Self {
        Self {
            body: f(self.body),
            ..self
        }
    }
}
