//! Like toggle endpoint.
//!
//! The toggle reads the artwork, decides whether the user already likes it,
//! then writes the change as a separate store call. Two concurrent toggles
//! for the same artwork can therefore both observe the same `likedBy` and
//! race.
//!
//! Unliking increments `likeCount` just like liking does; `likeCount` counts
//! toggles, while `likedBy` holds the current likers.

use aerosol::axum::Dep;
use axum::{
    Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
};
use clients::easel::{Document, LikeRequest, MessageResponse, field};
use derive_more::Display;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::db::{Collection, DocumentId, Filter, Store, Update};

/// Direction of a like toggle.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum Toggle {
    #[display("liked")]
    Like,

    #[display("unliked")]
    Unlike,
}

impl Toggle {
    /// Decide the toggle direction and the updates that perform it.
    pub fn plan(artwork: &Document, email: &str) -> (Self, [Update; 2]) {
        let email = Value::String(email.to_string());
        let liked = artwork
            .get(field::LIKED_BY)
            .and_then(Value::as_array)
            .is_some_and(|liked_by| liked_by.contains(&email));

        let count = Update::Inc {
            field: field::LIKE_COUNT,
            by: 1,
        };
        if liked {
            let pull = Update::Pull {
                field: field::LIKED_BY,
                value: email,
            };
            (Self::Unlike, [pull, count])
        } else {
            let add = Update::AddToSet {
                field: field::LIKED_BY,
                value: email,
            };
            (Self::Like, [add, count])
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Toggle::Like => "Liked the art",
            Toggle::Unlike => "Unliked the art",
        }
    }
}

/// Toggle the requesting user's like on an artwork.
#[tracing::instrument(skip(store))]
pub async fn handle(
    Dep(store): Dep<Store>,
    Path(id): Path<String>,
    Json(request): Json<LikeRequest>,
) -> Response {
    let id = match id.parse::<DocumentId>() {
        Ok(id) => id,
        Err(error) => {
            warn!(?error, "art_data.like.invalid_id");
            return Response::InvalidId;
        }
    };

    let artwork = match store.find_one(Collection::Artworks, &Filter::Id(id)).await {
        Ok(Some(artwork)) => artwork,
        Ok(None) => return Response::NotFound,
        Err(error) => {
            error!(?error, "art_data.like.fetch_error");
            return Response::Error;
        }
    };

    let (toggle, updates) = Toggle::plan(&artwork.fields, &request.email);
    match store.update_one(Collection::Artworks, id, &updates).await {
        Ok(true) => {
            info!(%id, %toggle, "art_data.like.success");
            Response::Toggled(toggle)
        }
        // Deleted between the read and the write.
        Ok(false) => Response::NotFound,
        Err(error) => {
            error!(?error, "art_data.like.error");
            Response::Error
        }
    }
}

#[derive(Debug)]
pub enum Response {
    Toggled(Toggle),
    NotFound,
    InvalidId,
    Error,
}

impl IntoResponse for Response {
    fn into_response(self) -> AxumResponse {
        match self {
            Response::Toggled(toggle) => {
                (StatusCode::OK, Json(MessageResponse::new(toggle.message()))).into_response()
            }
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
                Json(MessageResponse::new("Error updating like")),
            )
                .into_response(),
        }
    }
}
