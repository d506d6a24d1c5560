//! Easel API types and client.
//!
//! Documents are schemaless: artworks, gallery entries, and favorites travel
//! as plain JSON objects ([`Document`]). Only the envelopes the server wraps
//! around them are typed here.

use bon::Builder;
use serde::{Deserialize, Serialize};

#[cfg(feature = "client")]
mod client;

#[cfg(feature = "client")]
pub use client::Client;

/// A schemaless document as submitted to or returned by the API.
///
/// Documents returned by the server carry their store-generated identifier
/// under [`field::ID`].
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Field names used by the API.
pub mod field {
    /// The store-generated identifier of a returned document.
    pub const ID: &str = "_id";

    /// Owner of an artwork or favorite.
    pub const EMAIL: &str = "email";

    /// Owner of a gallery entry.
    pub const USER_EMAIL: &str = "userEmail";

    /// Client-assigned identifier on gallery entries; used by deletes.
    pub const ENTRY_ID: &str = "id";

    /// Artwork referenced by a favorite.
    pub const ART_ID: &str = "artId";

    /// Sort key for the homepage feed.
    pub const POSTED_AT: &str = "postedAt";

    /// Number of likes recorded on an artwork.
    pub const LIKE_COUNT: &str = "likeCount";

    /// Emails of the users who currently like an artwork.
    pub const LIKED_BY: &str = "likedBy";
}

/// Acknowledgment returned after inserting a document.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct InsertAck {
    /// Whether the store acknowledged the write.
    pub acknowledged: bool,

    /// The identifier generated for the new document.
    pub inserted_id: String,
}

impl InsertAck {
    /// An acknowledged insert of the document with the given id.
    pub fn new(inserted_id: impl ToString) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.to_string(),
        }
    }
}

/// Outcome of a delete request.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct DeleteResponse {
    /// Whether a document was removed.
    pub success: bool,

    /// Human readable description of the outcome.
    pub message: String,
}

impl DeleteResponse {
    /// A document was removed.
    pub fn deleted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Nothing was removed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A bare message body, used for like toggles and generic errors.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a like toggle request.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct LikeRequest {
    /// The user toggling their like.
    #[builder(into)]
    pub email: String,
}

/// Optional owner filter accepted by list endpoints as `?email=`.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct EmailFilter {
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
