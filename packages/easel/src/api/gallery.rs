//! Per-user artwork gallery endpoint.

use aerosol::axum::Dep;
use axum::{Router, extract::Path, routing::get};
use clients::easel::field;
use tracing::{error, info};

use crate::{
    api::{ListResponse, State},
    db::{Collection, Filter, Find, Store},
};

pub fn router() -> Router<State> {
    Router::new().route("/gallery/{email}", get(handle))
}

/// Artworks whose `email` field is the path email.
///
/// This reads the artwork collection, not the gallery entry collection
/// behind `/add-gallery`.
#[tracing::instrument(skip(store))]
pub async fn handle(Dep(store): Dep<Store>, Path(email): Path<String>) -> ListResponse {
    let find = Find::matching(Filter::field(field::EMAIL, email));
    match store.find(Collection::Artworks, &find).await {
        Ok(artworks) => {
            info!(count = artworks.len(), "gallery.success");
            ListResponse::found(artworks)
        }
        Err(error) => {
            error!(?error, "gallery.error");
            ListResponse::Error
        }
    }
}
