//! Authenticated request builder for The One API movie endpoints.
//!
//! # Design
//! `LotrClient` holds the base URL, the bearer token and a transport. Every
//! endpoint has a `build_*` method producing an `HttpRequest` without I/O and
//! an executing method that hands that request to the transport and returns
//! the response untouched. All of them go through one private builder, which
//! is where the authorization header is attached.

use std::fmt;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::query::QueryParams;
use crate::transport::{Transport, UreqTransport};

const AUTHORIZATION: &str = "authorization";

/// Blocking client for the movie and quote endpoints.
///
/// Status codes and bodies are never interpreted: a 401 for a bad token or a
/// server error for an unknown movie id comes back as an ordinary
/// `HttpResponse`.
#[derive(Clone)]
pub struct LotrClient<T = UreqTransport> {
    base_url: String,
    token: String,
    default_headers: Vec<(String, String)>,
    transport: T,
}

impl LotrClient<UreqTransport> {
    /// Client for the public service. Does not touch the network.
    pub fn new(token: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(token))
    }

    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Self {
        Self::from_config(ClientConfig::new(token).base_url(base_url))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config.token, &config.base_url, transport)
    }
}

impl<T: Transport> LotrClient<T> {
    pub fn with_transport(token: impl Into<String>, base_url: &str, transport: T) -> Self {
        let token = token.into();
        let default_headers = vec![(AUTHORIZATION.to_string(), format!("Bearer {token}"))];
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            default_headers,
            transport,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request.
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_list_movies(&self, params: &QueryParams, options: &RequestOptions) -> HttpRequest {
        self.build("movie", params, options)
    }

    /// `movie_id` is inserted as-is; the server decides whether it is valid.
    pub fn build_get_movie(
        &self,
        movie_id: &str,
        params: &QueryParams,
        options: &RequestOptions,
    ) -> HttpRequest {
        self.build(&format!("movie/{movie_id}"), params, options)
    }

    pub fn build_get_movie_quotes(
        &self,
        movie_id: &str,
        params: &QueryParams,
        options: &RequestOptions,
    ) -> HttpRequest {
        self.build(&format!("movie/{movie_id}/quote"), params, options)
    }

    /// `GET {base}/movie`
    pub fn list_movies(&self, params: &QueryParams) -> Result<HttpResponse> {
        self.list_movies_with(params, &RequestOptions::default())
    }

    pub fn list_movies_with(
        &self,
        params: &QueryParams,
        options: &RequestOptions,
    ) -> Result<HttpResponse> {
        self.send(self.build_list_movies(params, options))
    }

    /// `GET {base}/movie/{movie_id}`
    pub fn get_movie(&self, movie_id: &str, params: &QueryParams) -> Result<HttpResponse> {
        self.get_movie_with(movie_id, params, &RequestOptions::default())
    }

    pub fn get_movie_with(
        &self,
        movie_id: &str,
        params: &QueryParams,
        options: &RequestOptions,
    ) -> Result<HttpResponse> {
        self.send(self.build_get_movie(movie_id, params, options))
    }

    /// `GET {base}/movie/{movie_id}/quote`
    pub fn get_movie_quotes(&self, movie_id: &str, params: &QueryParams) -> Result<HttpResponse> {
        self.get_movie_quotes_with(movie_id, params, &RequestOptions::default())
    }

    pub fn get_movie_quotes_with(
        &self,
        movie_id: &str,
        params: &QueryParams,
        options: &RequestOptions,
    ) -> Result<HttpResponse> {
        self.send(self.build_get_movie_quotes(movie_id, params, options))
    }

    fn build(&self, path: &str, params: &QueryParams, options: &RequestOptions) -> HttpRequest {
        let mut headers = self.default_headers.clone();
        headers.extend(
            options
                .headers
                .iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION))
                .cloned(),
        );

        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/{}{}", self.base_url, path, params.encode()),
            headers,
            timeout: options.timeout,
        }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        self.transport.execute(&request)
    }
}

impl<T> fmt::Debug for LotrClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LotrClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use super::*;

    /// Records every request and answers with a fixed status.
    struct RecordingTransport {
        status: u16,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl RecordingTransport {
        fn new(status: u16) -> Self {
            Self {
                status,
                requests: RefCell::new(Vec::new()),
            }
        }

        fn recorded(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for RecordingTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: br#"{"docs":[]}"#.to_vec(),
            })
        }
    }

    const BASE: &str = "https://the-one-api.dev/v2";

    fn client() -> LotrClient<RecordingTransport> {
        LotrClient::with_transport("my_token", BASE, RecordingTransport::new(200))
    }

    fn none() -> QueryParams {
        QueryParams::new()
    }

    #[test]
    fn construction_sets_bearer_header() {
        for token in ["my_token", "", "with space", "ÿ-unicode"] {
            let client = LotrClient::new(token);
            assert_eq!(client.token(), token);
            assert_eq!(
                client.default_headers(),
                &[("authorization".to_string(), format!("Bearer {token}"))]
            );
        }
    }

    #[test]
    fn new_targets_public_service() {
        assert_eq!(LotrClient::new("t").base_url(), "https://the-one-api.dev/v2");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = LotrClient::with_base_url("t", "http://localhost:3000/v2/");
        assert_eq!(client.base_url(), "http://localhost:3000/v2");
        let req = client.build_list_movies(&none(), &RequestOptions::default());
        assert_eq!(req.url, "http://localhost:3000/v2/movie");
    }

    #[test]
    fn build_list_movies_produces_correct_request() {
        let req = client().build_list_movies(&none(), &RequestOptions::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://the-one-api.dev/v2/movie");
        assert_eq!(req.header("Authorization"), Some("Bearer my_token"));
        assert_eq!(req.timeout, None);
    }

    #[test]
    fn build_get_movie_produces_correct_request() {
        let req = client().build_get_movie("123", &none(), &RequestOptions::default());
        assert_eq!(req.url, "https://the-one-api.dev/v2/movie/123");
    }

    #[test]
    fn build_get_movie_quotes_appends_query() {
        let params = QueryParams::new().limit(5).filter("dialog=/ring/i");
        let req = client().build_get_movie_quotes("123", &params, &RequestOptions::default());
        assert_eq!(
            req.url,
            "https://the-one-api.dev/v2/movie/123/quote?limit=5&dialog=/ring/i"
        );
    }

    #[test]
    fn list_movies_sends_one_get_without_query() {
        let client = client();
        let resp = client.list_movies(&none()).unwrap();
        assert_eq!(resp.status, 200);

        let sent = client.transport().recorded();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(sent[0].url, "https://the-one-api.dev/v2/movie");
    }

    #[test]
    fn get_movie_sends_to_movie_path() {
        let client = client();
        client.get_movie("123", &none()).unwrap();
        let sent = client.transport().recorded();
        assert_eq!(sent[0].url, "https://the-one-api.dev/v2/movie/123");
        assert_eq!(sent[0].header("authorization"), Some("Bearer my_token"));
    }

    #[test]
    fn get_movie_quotes_sends_to_quote_path() {
        let client = client();
        client.get_movie_quotes("123", &none()).unwrap();
        let sent = client.transport().recorded();
        assert_eq!(sent[0].url, "https://the-one-api.dev/v2/movie/123/quote");
    }

    #[test]
    fn options_are_forwarded_after_authorization() {
        let client = client();
        let options = RequestOptions::new()
            .timeout(Duration::from_millis(250))
            .header("x-trace", "1")
            .header("Authorization", "Bearer someone-else");
        client.list_movies_with(&QueryParams::new().page(2), &options).unwrap();

        let sent = client.transport().recorded();
        assert_eq!(sent[0].url, "https://the-one-api.dev/v2/movie?page=2");
        assert_eq!(sent[0].timeout, Some(Duration::from_millis(250)));
        assert_eq!(
            sent[0].headers,
            vec![
                ("authorization".to_string(), "Bearer my_token".to_string()),
                ("x-trace".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn error_statuses_are_returned_unchanged() {
        let client = LotrClient::with_transport("bad", BASE, RecordingTransport::new(401));
        let resp = client.get_movie("nope", &none()).unwrap();
        assert_eq!(resp.status, 401);
        assert!(!resp.is_success());
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", client());
        assert!(rendered.contains(BASE));
        assert!(!rendered.contains("my_token"));
    }
}
