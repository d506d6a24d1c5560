//! List favorites endpoint.

use aerosol::axum::Dep;
use axum::extract::Query;
use clients::easel::{EmailFilter, field};
use tracing::{error, info};

use crate::{
    api::ListResponse,
    db::{Collection, Filter, Find, Store},
};

/// Favorites whose `email` is the `email` query parameter, or every favorite
/// when the parameter is absent.
#[tracing::instrument(skip(store))]
pub async fn handle(Dep(store): Dep<Store>, Query(query): Query<EmailFilter>) -> ListResponse {
    let find = Find::matching(Filter::field_if_some(field::EMAIL, query.email));
    match store.find(Collection::Favorites, &find).await {
        Ok(favorites) => {
            info!(count = favorites.len(), "my_favorites.list.success");
            ListResponse::found(favorites)
        }
        Err(error) => {
            error!(?error, "my_favorites.list.error");
            ListResponse::Error
        }
    }
}
