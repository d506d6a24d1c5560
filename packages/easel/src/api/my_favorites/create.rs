//! Add favorite endpoint.

use aerosol::axum::Dep;
use axum::Json;
use clients::easel::{Document, InsertAck};
use tracing::{error, info};

use crate::{
    api::InsertResponse,
    db::{Collection, Store},
};

/// Record a favorite exactly as submitted.
///
/// Favorites are not deduplicated: posting the same body twice stores two
/// favorites.
#[tracing::instrument(skip(store, favorite))]
pub async fn handle(Dep(store): Dep<Store>, Json(favorite): Json<Document>) -> InsertResponse {
    match store.insert(Collection::Favorites, favorite).await {
        Ok(id) => {
            info!(%id, "my_favorites.create.success");
            InsertResponse::Inserted(InsertAck::new(id))
        }
        Err(error) => {
            error!(?error, "my_favorites.create.error");
            InsertResponse::Error
        }
    }
}
