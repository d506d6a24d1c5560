//! Gallery entry endpoints.
//!
//! Gallery entries are a separate collection from artworks, even though the
//! two hold similar data.

use axum::{
    Router,
    routing::{delete, post},
};

use crate::api::State;

pub mod create;
pub mod list;
pub mod remove;

pub fn router() -> Router<State> {
    Router::new()
        .route("/add-gallery", post(create::handle).get(list::handle))
        .route("/add-gallery/{id}", delete(remove::handle))
}
