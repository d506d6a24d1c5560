//! Fetch a single artwork endpoint.

use aerosol::axum::Dep;
use axum::{
    Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
};
use clients::easel::{Document, MessageResponse};
use tracing::{error, info, warn};

use crate::db::{Collection, DocumentId, Filter, Store};

/// Fetch an artwork by its store identifier.
///
/// An identifier that cannot be parsed is reported as a server error, the
/// same as a store failure.
#[tracing::instrument(skip(store))]
pub async fn handle(Dep(store): Dep<Store>, Path(id): Path<String>) -> Response {
    let id = match id.parse::<DocumentId>() {
        Ok(id) => id,
        Err(error) => {
            warn!(?error, "explore_art.show.invalid_id");
            return Response::InvalidId;
        }
    };

    match store.find_one(Collection::Artworks, &Filter::Id(id)).await {
        Ok(Some(artwork)) => {
            info!(%id, "explore_art.show.success");
            Response::Found(artwork.into_document())
        }
        Ok(None) => {
            info!(%id, "explore_art.show.not_found");
            Response::NotFound
        }
        Err(error) => {
            error!(?error, "explore_art.show.error");
            Response::Error
        }
    }
}

#[derive(Debug)]
pub enum Response {
    Found(Document),
    NotFound,
    InvalidId,
    Error,
}

impl IntoResponse for Response {
    fn into_response(self) -> AxumResponse {
        match self {
            Response::Found(artwork) => (StatusCode::OK, Json(artwork)).into_response(),
            Response::NotFound => (
                StatusCode::NOT_FOUND,
                Json(MessageResponse::new("Art not found")),
            )
                .into_response(),
            Response::InvalidId => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Invalid art id")),
            )
                .into_response(),
            Response::Error => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Error fetching art")),
            )
                .into_response(),
        }
    }
}
