//! Delete gallery entry endpoint.

use aerosol::axum::Dep;
use axum::extract::Path;
use clients::easel::field;
use tracing::{error, info};

use crate::{
    api::DeleteOutcome,
    db::{Collection, Filter, Store},
};

/// Delete the first gallery entry whose `id` field is the path value.
///
/// The match is on the entry's own `id` field, not on the store identifier
/// returned at insert time.
#[tracing::instrument(skip(store))]
pub async fn handle(Dep(store): Dep<Store>, Path(id): Path<String>) -> DeleteOutcome {
    let filter = Filter::field(field::ENTRY_ID, id);
    match store.delete_one(Collection::Gallery, &filter).await {
        Ok(true) => {
            info!("add_gallery.delete.success");
            DeleteOutcome::Deleted("Gallery item deleted successfully")
        }
        Ok(false) => {
            info!("add_gallery.delete.not_found");
            DeleteOutcome::NotFound("Gallery item not found")
        }
        Err(error) => {
            error!(?error, "add_gallery.delete.error");
            DeleteOutcome::Error
        }
    }
}
