//! Error types for the One API client.
//!
//! # Design
//! HTTP status codes are not errors here: a 401 or 404 comes back as an
//! `HttpResponse` for the caller to inspect. Only failures to complete the
//! round trip, to read configuration, or to decode a body on request are
//! reported through `ApiError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS failure or a broken body read,
    /// exactly as the transport reported it.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    /// The request URL could not be parsed before sending.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("environment variable {var} has invalid value {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    /// Only produced by `HttpResponse::json`.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
