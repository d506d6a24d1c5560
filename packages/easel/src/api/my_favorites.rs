//! Favorite artwork endpoints.

use axum::{
    Router,
    routing::{delete, get},
};

use crate::api::State;

pub mod create;
pub mod list;
pub mod remove;

pub fn router() -> Router<State> {
    Router::new()
        .route("/myFavorites", get(list::handle).post(create::handle))
        .route("/myFavorites/{id}", delete(remove::handle))
}
