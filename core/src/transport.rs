//! Blocking transport that executes `HttpRequest` values.
//!
//! `UreqTransport` wraps a single `ureq::Agent`, so its connection pool is
//! reused for every call made through one client. Non-2xx statuses are
//! returned as data rather than errors.
//!
//! Filters reach the transport exactly as the caller wrote them, so the URL
//! is normalised here: characters the HTTP stack refuses in a URI (space,
//! `"`, `<`, `>`) are percent-encoded while `/`, `:`, `=` and `&` are kept.

use std::time::Duration;

use tracing::debug;
use ureq::http::{HeaderName, HeaderValue};
use url::Url;

use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one request and returns the response unchanged.
///
/// Implement this to route calls through another HTTP stack or to record
/// requests in tests.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl UreqTransport {
    /// `timeout` bounds every call made through this transport unless the
    /// request carries its own.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = normalize_url(&request.url)?;
        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(url.as_str()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.config().timeout_global(Some(timeout)).build();
        }

        let mut response = builder.call()?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| header_pair(name, value))
            .collect();
        let body = response.body_mut().read_to_vec()?;

        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn normalize_url(raw: &str) -> Result<String> {
    Ok(Url::parse(raw)?.into())
}

// Values are kept even when they are not visible ASCII.
fn header_pair(name: &HeaderName, value: &HeaderValue) -> (String, String) {
    (
        name.as_str().to_string(),
        String::from_utf8_lossy(value.as_bytes()).into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn comparison_filters_are_percent_encoded() {
        let url = normalize_url(
            "https://the-one-api.dev/v2/movie?limit=10&sort=name:asc&budgetInMillions<100",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://the-one-api.dev/v2/movie?limit=10&sort=name:asc&budgetInMillions%3C100"
        );

        let url = normalize_url(
            "https://the-one-api.dev/v2/movie?runtimeInMinutes>=160&academyAwardWins>0",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://the-one-api.dev/v2/movie?runtimeInMinutes%3E=160&academyAwardWins%3E0"
        );
    }

    #[test]
    fn spaces_are_encoded_and_separators_kept() {
        let url = normalize_url("http://127.0.0.1:3000/v2/movie?name=The Two Towers&dialog=/ring/i")
            .unwrap();
        assert_eq!(url, "http://127.0.0.1:3000/v2/movie?name=The%20Two%20Towers&dialog=/ring/i");
    }

    #[test]
    fn plain_urls_are_unchanged() {
        let raw = "https://the-one-api.dev/v2/movie/5cd95395de30eff6ebccde5d/quote?offset=1";
        assert_eq!(normalize_url(raw).unwrap(), raw);
    }

    #[test]
    fn unparseable_url_is_an_error() {
        let err = normalize_url("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn non_ascii_header_values_are_kept() {
        let name = HeaderName::from_static("x-character");
        let value = HeaderValue::from_bytes("Éowyn".as_bytes()).unwrap();
        assert_eq!(header_pair(&name, &value), ("x-character".to_string(), "Éowyn".to_string()));

        let latin1 = HeaderValue::from_bytes(b"caf\xe9").unwrap();
        let (_, text) = header_pair(&name, &latin1);
        assert_eq!(text, "caf\u{fffd}");
    }
}
