#![forbid(unsafe_code)]

//! JSON request helper shared by the kiosk screens.
//!
//! Requests default to `Content-Type: application/json`. Any non-2xx status
//! or transport failure is reported once as an [`ApiError`]; nothing is
//! retried.

use serde_json::Value;
use thiserror::Error;
use tracing::error;

/// Failure of a kiosk API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {0}")]
    Status(u16),
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    Decode(String),
}

/// A prepared request. The body is kept exactly as it will be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    url: String,
    method: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl ApiRequest {
    /// `GET url` with the JSON content type.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            method: "GET".to_owned(),
            headers: vec![("Content-Type".to_owned(), "application/json".to_owned())],
            body: None,
        }
    }

    /// `POST url` with a JSON body.
    #[must_use]
    pub fn post(url: &str, body: Value) -> Self {
        Self::new(url).method("POST").json(body)
    }

    #[must_use]
    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_ascii_uppercase();
        self
    }

    /// Add or replace a header; header names compare case-insensitively.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => value.clone_into(&mut slot.1),
            None => self.headers.push((name.to_owned(), value.to_owned())),
        }
        self
    }

    /// Serialize `body` as the request body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Send `raw` untouched (form-encoded text, pre-serialized JSON).
    #[must_use]
    pub fn body(mut self, raw: impl Into<String>) -> Self {
        self.body = Some(raw.into());
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Body as it will be sent, if any.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Turn a response into JSON or an error. A 2xx response must carry a JSON
/// body; an empty one is a [`ApiError::Decode`].
pub fn interpret_response(url: &str, status: u16, body: &str) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        return Err(report(url, ApiError::Status(status)));
    }
    serde_json::from_str(body).map_err(|err| report(url, ApiError::Decode(err.to_string())))
}

/// Log a failed call once and hand the error back to the caller.
pub fn report(url: &str, err: ApiError) -> ApiError {
    error!(url, error = %err, "API request error");
    err
}
