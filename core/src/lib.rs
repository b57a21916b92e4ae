//! Blocking client for The One API (`https://the-one-api.dev/v2`).
//!
//! # Overview
//! Turns method calls into authenticated `GET` requests against the movie and
//! quote endpoints and returns the raw `HttpResponse`. Nothing is cached,
//! retried, paginated or parsed on the caller's behalf.
//!
//! ```no_run
//! use lotr_core::{LotrClient, QueryParams};
//!
//! let client = LotrClient::new("your-access-token");
//! let movies = client.list_movies(&QueryParams::new().limit(5).sort("name:asc"))?;
//! println!("{} {}", movies.status, movies.text());
//! # Ok::<(), lotr_core::ApiError>(())
//! ```
//!
//! # Design
//! - `LotrClient` splits each endpoint into a pure `build_*` step and an
//!   executing step, so URLs and headers are testable without a network.
//! - `QueryParams::encode` owns the query-string contract: fixed key order,
//!   verbatim filters, zero and empty values treated as absent.
//! - `Transport` is the I/O seam; `UreqTransport` is the default.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod transport;

pub use client::LotrClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use query::{Filters, QueryParams};
pub use transport::{Transport, UreqTransport};
