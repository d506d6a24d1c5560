//! Delete favorite endpoint.

use aerosol::axum::Dep;
use axum::extract::Path;
use clients::easel::field;
use tracing::{error, info};

use crate::{
    api::DeleteOutcome,
    db::{Collection, Filter, Store},
};

/// Delete the first favorite whose `artId` is the path value.
///
/// Favorites of every user are candidates; the request carries no owner.
#[tracing::instrument(skip(store))]
pub async fn handle(Dep(store): Dep<Store>, Path(art_id): Path<String>) -> DeleteOutcome {
    let filter = Filter::field(field::ART_ID, art_id);
    match store.delete_one(Collection::Favorites, &filter).await {
        Ok(true) => {
            info!("my_favorites.delete.success");
            DeleteOutcome::Deleted("Favorite removed successfully")
        }
        Ok(false) => {
            info!("my_favorites.delete.not_found");
            DeleteOutcome::NotFound("Favorite not found")
        }
        Err(error) => {
            error!(?error, "my_favorites.delete.error");
            DeleteOutcome::Error
        }
    }
}
