//! HTTP utilities for the GitHub REST API

use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging huge payloads)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // The cap can land inside a multi-byte character; back up to a
        // boundary before slicing.
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for GitHub API calls
///
/// Success returns the decoded JSON value, anything else is an error.
/// Callers never inspect status codes beyond that split.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent("orgstream/0.1.0").build()?;

        Ok(Self { client })
    }

    /// Make a GET request and decode the JSON response
    pub async fn get(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::Api { status });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::MalformedResponse(format!("response body is not JSON: {e}")))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new().expect("Failed to create default HTTP transport")
    }
}
