//! In-process stand-in for the-one-api.dev movie and quote endpoints.
//!
//! Serves a fixed set of movies and quotes under `/v2`, rejects requests
//! without a bearer token, and records every request it sees so tests can
//! check exactly what went over the wire.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub runtime_in_minutes: u32,
    pub budget_in_millions: f64,
    pub box_office_revenue_in_millions: f64,
    pub academy_award_nominations: u32,
    pub academy_award_wins: u32,
    pub rotten_tomatoes_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: String,
    pub dialog: String,
    pub movie: String,
    pub character: String,
}

/// Response envelope used by every list and lookup endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub page: usize,
    pub pages: usize,
}

/// What the server saw for one incoming request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

pub type RequestLog = Arc<RwLock<Vec<RecordedRequest>>>;

#[derive(Deserialize)]
struct Paging {
    limit: Option<usize>,
    page: Option<usize>,
    offset: Option<usize>,
}

#[derive(Clone)]
struct AppState {
    movies: Arc<Vec<Movie>>,
    quotes: Arc<Vec<Quote>>,
    log: RequestLog,
}

pub fn app() -> Router {
    app_with_log(RequestLog::default())
}

pub fn app_with_log(log: RequestLog) -> Router {
    let state = AppState {
        movies: Arc::new(movies()),
        quotes: Arc::new(quotes()),
        log,
    };
    Router::new()
        .route("/v2/movie", get(list_movies))
        .route("/v2/movie/{id}", get(get_movie))
        .route("/v2/movie/{id}/quote", get(list_movie_quotes))
        .layer(middleware::from_fn_with_state(state.clone(), record_and_authorize))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_log(listener: TcpListener, log: RequestLog) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_log(log)).await
}

async fn record_and_authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        authorization: authorization.clone(),
    };
    info!(method = %recorded.method, path = %recorded.path, query = ?recorded.query, "request");
    state.log.write().await.push(recorded);

    let token = authorization
        .as_deref()
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();
    if token.is_empty() {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized.");
    }

    next.run(request).await
}

async fn list_movies(State(state): State<AppState>, Query(paging): Query<Paging>) -> Json<Page<Movie>> {
    Json(paginate(&state.movies, &paging))
}

async fn get_movie(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.movies.iter().find(|m| m.id == id) {
        Some(movie) => Json(paginate(std::slice::from_ref(movie), &Paging::none())).into_response(),
        None => failure(StatusCode::NOT_FOUND, "Something went wrong."),
    }
}

async fn list_movie_quotes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(paging): Query<Paging>,
) -> Response {
    if !state.movies.iter().any(|m| m.id == id) {
        return failure(StatusCode::NOT_FOUND, "Something went wrong.");
    }
    let quotes: Vec<Quote> = state.quotes.iter().filter(|q| q.movie == id).cloned().collect();
    Json(paginate(&quotes, &paging)).into_response()
}

impl Paging {
    fn none() -> Self {
        Self {
            limit: None,
            page: None,
            offset: None,
        }
    }
}

/// Slice `items` the way the real service does: `offset` first, then whole
/// pages of `limit`. Zero values fall back to the defaults.
fn paginate<T: Clone>(items: &[T], paging: &Paging) -> Page<T> {
    let total = items.len();
    let limit = paging.limit.filter(|l| *l > 0).unwrap_or(1000);
    let page = paging.page.filter(|p| *p > 0).unwrap_or(1);
    let offset = paging.offset.unwrap_or(0);

    let start = offset.saturating_add((page - 1).saturating_mul(limit)).min(total);
    let end = start.saturating_add(limit).min(total);

    Page {
        docs: items[start..end].to_vec(),
        total,
        limit,
        offset,
        page,
        pages: total.div_ceil(limit),
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "success": false, "message": message });
    (status, Json(body)).into_response()
}

fn movies() -> Vec<Movie> {
    vec![
        Movie {
            id: "5cd95395de30eff6ebccde5c".to_string(),
            name: "The Fellowship of the Ring".to_string(),
            runtime_in_minutes: 178,
            budget_in_millions: 93.0,
            box_office_revenue_in_millions: 871.5,
            academy_award_nominations: 13,
            academy_award_wins: 4,
            rotten_tomatoes_score: 91.0,
        },
        Movie {
            id: "5cd95395de30eff6ebccde5b".to_string(),
            name: "The Two Towers".to_string(),
            runtime_in_minutes: 179,
            budget_in_millions: 94.0,
            box_office_revenue_in_millions: 926.0,
            academy_award_nominations: 6,
            academy_award_wins: 2,
            rotten_tomatoes_score: 96.0,
        },
        Movie {
            id: "5cd95395de30eff6ebccde5d".to_string(),
            name: "The Return of the King".to_string(),
            runtime_in_minutes: 201,
            budget_in_millions: 94.0,
            box_office_revenue_in_millions: 1120.0,
            academy_award_nominations: 11,
            academy_award_wins: 11,
            rotten_tomatoes_score: 95.0,
        },
    ]
}

fn quotes() -> Vec<Quote> {
    let quote = |id: &str, dialog: &str, movie: &str| Quote {
        id: id.to_string(),
        dialog: dialog.to_string(),
        movie: movie.to_string(),
        character: "5cd99d4bde30eff6ebccfea0".to_string(),
    };
    vec![
        quote(
            "5cd96e05de30eff6ebcce7e9",
            "Deagol!",
            "5cd95395de30eff6ebccde5d",
        ),
        quote(
            "5cd96e05de30eff6ebcce7ea",
            "Deagol!",
            "5cd95395de30eff6ebccde5d",
        ),
        quote(
            "5cd96e05de30eff6ebcce7eb",
            "Give us that! Deagol my love",
            "5cd95395de30eff6ebccde5d",
        ),
        quote(
            "5cd96e05de30eff6ebcce7e4",
            "All you have to decide is what to do with the time that is given to you.",
            "5cd95395de30eff6ebccde5c",
        ),
    ]
}
