//! Artwork interaction endpoints.

use axum::{Router, routing::patch};

use crate::api::State;

pub mod like;

pub fn router() -> Router<State> {
    Router::new().route("/artData/like/{id}", patch(like::handle))
}
