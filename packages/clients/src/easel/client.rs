//! HTTP client for the Easel API.

use std::sync::Arc;

use color_eyre::{
    Result, Section, SectionExt,
    eyre::{Context, eyre},
};
use derive_more::{Debug, Display};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{DeleteResponse, Document, EmailFilter, InsertAck, LikeRequest, MessageResponse};
use crate::{ContentType, REQUEST_ID_HEADER};

/// Client for the Easel API.
///
/// ## Cloning
///
/// This type is cheaply cloneable, and clones share the underlying HTTP
/// connection pool.
#[derive(Clone, Debug, Display)]
#[display("{base}")]
pub struct Client {
    #[debug("{:?}", base.as_str())]
    base: Arc<Url>,

    #[debug(skip)]
    http: reqwest::Client,
}

impl Client {
    /// Create a new client with the given base URL.
    pub fn new(base: Url) -> Result<Self> {
        let http = reqwest::Client::builder()
            .gzip(true)
            .brotli(true)
            .build()
            .context("build http client")?;

        Ok(Self {
            base: Arc::new(base),
            http,
        })
    }

    /// Build the URL for a route under the base URL.
    ///
    /// Each segment is percent-encoded as a single path segment, so values
    /// such as `g:1` or `ana#1@example.com` cannot escape the route.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = Url::clone(&self.base);
        url.path_segments_mut()
            .map_err(|()| eyre!("base URL cannot have path segments: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Check that the service and its store are reachable.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<()> {
        let url = self.endpoint(["health"])?;
        let response = self.http.get(url).send().await.context("send")?;
        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(unexpected(status, response).await),
        }
    }

    /// Submit a new artwork.
    #[instrument(skip(self))]
    pub async fn create_artwork(&self, artwork: &Document) -> Result<InsertAck> {
        let url = self.endpoint(["explore-art"])?;
        let response = self.http.post(url).json(artwork).send().await.context("send")?;
        json_ok(response).await
    }

    /// List every artwork in store order.
    #[instrument(skip(self))]
    pub async fn artworks(&self) -> Result<Vec<Document>> {
        let url = self.endpoint(["explore-art"])?;
        let response = self.http.get(url).send().await.context("send")?;
        json_ok(response).await
    }

    /// Fetch a single artwork; `None` if no artwork has the id.
    #[instrument(skip(self))]
    pub async fn artwork(&self, id: &str) -> Result<Option<Document>> {
        let url = self.endpoint(["explore-art", id])?;
        let response = self.http.get(url).send().await.context("send")?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            _ => json_ok(response).await.map(Some),
        }
    }

    /// The most recently posted artworks.
    #[instrument(skip(self))]
    pub async fn homepage_artworks(&self) -> Result<Vec<Document>> {
        let url = self.endpoint(["homepage-art"])?;
        let response = self.http.get(url).send().await.context("send")?;
        json_ok(response).await
    }

    /// Toggle `email`'s like on an artwork; returns the server's message.
    #[instrument(skip(self))]
    pub async fn toggle_like(&self, id: &str, email: &str) -> Result<String> {
        let url = self.endpoint(["artData", "like", id])?;
        let body = LikeRequest::builder().email(email).build();
        let response = self.http.patch(url).json(&body).send().await.context("send")?;
        json_ok::<MessageResponse>(response)
            .await
            .map(|body| body.message)
    }

    /// Artworks owned by `email`.
    #[instrument(skip(self))]
    pub async fn gallery(&self, email: &str) -> Result<Vec<Document>> {
        let url = self.endpoint(["gallery", email])?;
        let response = self.http.get(url).send().await.context("send")?;
        json_ok(response).await
    }

    /// Add an entry to the gallery collection.
    #[instrument(skip(self))]
    pub async fn add_gallery_entry(&self, entry: &Document) -> Result<InsertAck> {
        let url = self.endpoint(["add-gallery"])?;
        let response = self.http.post(url).json(entry).send().await.context("send")?;
        json_ok(response).await
    }

    /// List gallery entries, optionally only those owned by the filter email.
    #[instrument(skip(self))]
    pub async fn gallery_entries(&self, filter: &EmailFilter) -> Result<Vec<Document>> {
        let url = self.endpoint(["add-gallery"])?;
        let response = self
            .http
            .get(url)
            .query(filter)
            .send()
            .await
            .context("send")?;
        json_ok(response).await
    }

    /// Delete the gallery entry whose `id` field matches.
    #[instrument(skip(self))]
    pub async fn delete_gallery_entry(&self, id: &str) -> Result<DeleteResponse> {
        let url = self.endpoint(["add-gallery", id])?;
        let response = self.http.delete(url).send().await.context("send")?;
        delete_outcome(response).await
    }

    /// List favorites, optionally only those owned by the filter email.
    #[instrument(skip(self))]
    pub async fn favorites(&self, filter: &EmailFilter) -> Result<Vec<Document>> {
        let url = self.endpoint(["myFavorites"])?;
        let response = self
            .http
            .get(url)
            .query(filter)
            .send()
            .await
            .context("send")?;
        json_ok(response).await
    }

    /// Record a favorite.
    #[instrument(skip(self))]
    pub async fn add_favorite(&self, favorite: &Document) -> Result<InsertAck> {
        let url = self.endpoint(["myFavorites"])?;
        let response = self
            .http
            .post(url)
            .json(favorite)
            .send()
            .await
            .context("send")?;
        json_ok(response).await
    }

    /// Delete the favorite referencing the artwork `art_id`.
    #[instrument(skip(self))]
    pub async fn delete_favorite(&self, art_id: &str) -> Result<DeleteResponse> {
        let url = self.endpoint(["myFavorites", art_id])?;
        let response = self.http.delete(url).send().await.context("send")?;
        delete_outcome(response).await
    }
}

/// Parse a 200 JSON response, or report the unexpected status.
async fn json_ok<T: DeserializeOwned>(response: Response) -> Result<T> {
    match response.status() {
        StatusCode::OK => {
            let content_type = response.headers().get(ContentType::HEADER);
            if !content_type.is_some_and(|value| value == ContentType::Json) {
                let content_type = content_type
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("<not set>")
                    .to_string();
                return Err(eyre!("unexpected content type: {content_type}")
                    .with_section(|| response.url().to_string().header("Url:")));
            }
            response.json::<T>().await.context("parse JSON response")
        }
        status => Err(unexpected(status, response).await),
    }
}

/// Deletes report their outcome in the body for both hits and misses.
async fn delete_outcome(response: Response) -> Result<DeleteResponse> {
    match response.status() {
        StatusCode::OK | StatusCode::NOT_FOUND => response
            .json::<DeleteResponse>()
            .await
            .context("parse JSON response"),
        status => Err(unexpected(status, response).await),
    }
}

async fn unexpected(status: StatusCode, response: Response) -> color_eyre::Report {
    let url = response.url().to_string();
    let request_id = request_id(&response);
    let body = response.text().await.unwrap_or_default();
    eyre!("unexpected status code: {status}")
        .with_section(|| url.header("Url:"))
        .with_section(|| body.header("Body:"))
        .with_section(|| request_id.header("Request ID:"))
}

/// Extract the request ID from a response header.
fn request_id(response: &Response) -> String {
    response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| String::from("<not set>"))
}
