//! Submit artwork endpoint.

use aerosol::axum::Dep;
use axum::Json;
use clients::easel::{Document, InsertAck};
use tracing::{error, info};

use crate::{
    api::InsertResponse,
    db::{Collection, Store},
};

/// Store a new artwork exactly as submitted.
#[tracing::instrument(skip(store, artwork))]
pub async fn handle(Dep(store): Dep<Store>, Json(artwork): Json<Document>) -> InsertResponse {
    match store.insert(Collection::Artworks, artwork).await {
        Ok(id) => {
            info!(%id, "explore_art.create.success");
            InsertResponse::Inserted(InsertAck::new(id))
        }
        Err(error) => {
            error!(?error, "explore_art.create.error");
            InsertResponse::Error
        }
    }
}
