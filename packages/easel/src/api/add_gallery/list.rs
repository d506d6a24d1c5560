//! List gallery entries endpoint.

use aerosol::axum::Dep;
use axum::extract::Query;
use clients::easel::{EmailFilter, field};
use tracing::{error, info};

use crate::{
    api::ListResponse,
    db::{Collection, Filter, Find, Store},
};

/// Gallery entries whose `userEmail` is the `email` query parameter, or
/// every entry when the parameter is absent.
#[tracing::instrument(skip(store))]
pub async fn handle(Dep(store): Dep<Store>, Query(query): Query<EmailFilter>) -> ListResponse {
    let find = Find::matching(Filter::field_if_some(field::USER_EMAIL, query.email));
    match store.find(Collection::Gallery, &find).await {
        Ok(entries) => {
            info!(count = entries.len(), "add_gallery.list.success");
            ListResponse::found(entries)
        }
        Err(error) => {
            error!(?error, "add_gallery.list.error");
            ListResponse::Error
        }
    }
}
