//! List artworks endpoint.

use aerosol::axum::Dep;
use tracing::{error, info};

use crate::{
    api::ListResponse,
    db::{Collection, Find, Store},
};

/// Every artwork, in the order they were submitted.
#[tracing::instrument(skip(store))]
pub async fn handle(Dep(store): Dep<Store>) -> ListResponse {
    match store.find(Collection::Artworks, &Find::all()).await {
        Ok(artworks) => {
            info!(count = artworks.len(), "explore_art.list.success");
            ListResponse::found(artworks)
        }
        Err(error) => {
            error!(?error, "explore_art.list.error");
            ListResponse::Error
        }
    }
}
