//! Homepage feed endpoint.

use aerosol::axum::Dep;
use axum::{Router, routing::get};
use clients::easel::field;
use tracing::{error, info};

use crate::{
    api::{ListResponse, State},
    db::{Collection, Find, Sort, Store},
};

/// Number of artworks shown on the homepage.
pub const HOMEPAGE_LIMIT: usize = 6;

pub fn router() -> Router<State> {
    Router::new().route("/homepage-art", get(handle))
}

/// The most recently posted artworks, newest first.
#[tracing::instrument(skip(store))]
pub async fn handle(Dep(store): Dep<Store>) -> ListResponse {
    let find = Find::builder()
        .sort(Sort::descending(field::POSTED_AT))
        .limit(HOMEPAGE_LIMIT)
        .build();
    match store.find(Collection::Artworks, &find).await {
        Ok(artworks) => {
            info!(count = artworks.len(), "homepage_art.success");
            ListResponse::found(artworks)
        }
        Err(error) => {
            error!(?error, "homepage_art.error");
            ListResponse::Error
        }
    }
}
