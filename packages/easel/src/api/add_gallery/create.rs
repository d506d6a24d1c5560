//! Add gallery entry endpoint.

use aerosol::axum::Dep;
use axum::Json;
use clients::easel::{Document, InsertAck};
use tracing::{error, info};

use crate::{
    api::InsertResponse,
    db::{Collection, Store},
};

/// Store a new gallery entry exactly as submitted.
#[tracing::instrument(skip(store, entry))]
pub async fn handle(Dep(store): Dep<Store>, Json(entry): Json<Document>) -> InsertResponse {
    match store.insert(Collection::Gallery, entry).await {
        Ok(id) => {
            info!(%id, "add_gallery.create.success");
            InsertResponse::Inserted(InsertAck::new(id))
        }
        Err(error) => {
            error!(?error, "add_gallery.create.error");
            InsertResponse::Error
        }
    }
}
