use aerosol::axum::Dep;
use axum::{http::StatusCode, response::IntoResponse};
use color_eyre::eyre::Report;
use tracing::{error, info};

use crate::db::Store;

/// Health check endpoint.
///
/// ## Validation
///
/// Validates that the document store is reachable before responding.
#[tracing::instrument(skip(store))]
pub async fn handle(Dep(store): Dep<Store>) -> PingResponse {
    match store.ping().await {
        Ok(()) => {
            info!("health.ping.success");
            PingResponse::Success
        }
        Err(error) => {
            error!(?error, "health.ping.error");
            PingResponse::Error(error)
        }
    }
}

#[derive(Debug)]
pub enum PingResponse {
    Success,
    Error(Report),
}

impl IntoResponse for PingResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            PingResponse::Success => StatusCode::OK.into_response(),
            PingResponse::Error(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{error:?}")).into_response()
            }
        }
    }
}
