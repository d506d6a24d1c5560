//! Artwork submission and browsing endpoints.

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::State;

pub mod create;
pub mod list;
pub mod show;

pub fn router() -> Router<State> {
    Router::new()
        .route("/explore-art", post(create::handle).get(list::handle))
        .route("/explore-art/{id}", get(show::handle))
}
