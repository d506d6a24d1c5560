//! API endpoint handlers for the service.
//!
//! ## Dependency injection
//!
//! We use [`aerosol`][^1] to inject the document store into handlers. The
//! store is constructed once at startup and handed to [`router`]; handlers
//! extract it with the [`Dep`](aerosol::axum::Dep) extractor. There is no
//! global store handle.
//!
//! [^1]: https://docs.rs/aerosol
//!
//! ## Response types
//!
//! Every handler returns a response type that implements
//! [`IntoResponse`](axum::response::IntoResponse), with one variant per
//! outcome: success, not found (where the endpoint has that notion), and
//! store error. Store errors are logged and rendered as a 500 with a generic
//! message; error details never reach the client.
//!
//! ## Paths
//!
//! Routes are unversioned and keep the names the web frontend already calls,
//! including the mixed-case `/artData` and `/myFavorites`.

use std::time::Instant;

use aerosol::Aero;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use clients::{
    REQUEST_ID_HEADER,
    easel::{DeleteResponse, Document, InsertAck, MessageResponse},
};
use tap::Pipe;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    decompression::RequestDecompressionLayer,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::db::StoredDocument;

pub mod add_gallery;
pub mod art_data;
pub mod explore_art;
pub mod gallery;
pub mod health;
pub mod homepage_art;
pub mod my_favorites;

/// Body size limit for JSON documents.
const MAX_JSON_BODY_SIZE: usize = 100 * 1024;

pub type State = Aero![crate::db::Store];

pub fn router(state: State) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(RequestDecompressionLayer::new())
        .layer(CompressionLayer::new());

    // The frontend is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::handle))
        .merge(explore_art::router())
        .merge(homepage_art::router())
        .merge(art_data::router())
        .merge(gallery::router())
        .merge(add_gallery::router())
        .merge(my_favorites::router())
        .layer(DefaultBodyLimit::max(MAX_JSON_BODY_SIZE))
        .layer(middleware)
        .layer(cors)
        .layer(axum::middleware::from_fn(trace_request))
        .with_state(state)
}

async fn trace_request(request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().map(|id| id.to_string()).ok())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let start = Instant::now();
    let url = request.uri().to_string();
    let method = request.method().to_string();

    let span = tracing::info_span!("http.request", %id, %url, %method);
    async move {
        let mut response = next.run(request).await;
        let status = response.status();
        let duration = start.elapsed();
        tracing::info!(%id, %url, %method, %status, ?duration, "http.request.response");

        if let Ok(id) = HeaderValue::from_str(&id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, id);
        }
        response
    }
    .instrument(span)
    .await
}

/// Response for endpoints that insert a document.
#[derive(Debug)]
pub enum InsertResponse {
    Inserted(InsertAck),
    Error,
}

impl IntoResponse for InsertResponse {
    fn into_response(self) -> Response {
        match self {
            InsertResponse::Inserted(ack) => (StatusCode::OK, Json(ack)).into_response(),
            InsertResponse::Error => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Error inserting data")),
            )
                .into_response(),
        }
    }
}

/// Response for endpoints that return a list of documents.
#[derive(Debug)]
pub enum ListResponse {
    Found(Vec<Document>),
    Error,
}

impl ListResponse {
    pub fn found(documents: Vec<StoredDocument>) -> Self {
        documents
            .into_iter()
            .map(StoredDocument::into_document)
            .collect::<Vec<_>>()
            .pipe(Self::Found)
    }
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            ListResponse::Found(documents) => (StatusCode::OK, Json(documents)).into_response(),
            ListResponse::Error => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Error fetching data")),
            )
                .into_response(),
        }
    }
}

/// Response for endpoints that delete a single document.
///
/// Each variant carries the message reported to the client.
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted(&'static str),
    NotFound(&'static str),
    Error,
}

impl IntoResponse for DeleteOutcome {
    fn into_response(self) -> Response {
        match self {
            DeleteOutcome::Deleted(message) => {
                (StatusCode::OK, Json(DeleteResponse::deleted(message))).into_response()
            }
            DeleteOutcome::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(DeleteResponse::failed(message))).into_response()
            }
            DeleteOutcome::Error => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DeleteResponse::failed("Internal server error")),
            )
                .into_response(),
        }
    }
}
