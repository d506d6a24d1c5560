//! Document store interface.
//!
//! The store is a set of named collections holding schemaless JSON
//! documents. [`Store`] dispatches to one of the backends:
//! - [`Postgres`]: JSONB tables, used in production.
//! - [`Memory`]: process-local, used by tests and `memory://` dev runs.
//!
//! # Serialization/Deserialization
//!
//! [`StoredDocument`] does not implement `Serialize`: handlers render it with
//! [`StoredDocument::into_document`], which is where the store identifier is
//! exposed as `_id`.

mod document;
mod memory;
mod postgres;

use clients::easel::{Document, field};
use color_eyre::{Result, eyre::Context};
use derive_more::{Debug, From};

pub use document::{Collection, DocumentId, Filter, Find, Order, Sort, StoredDocument, Update};
pub use memory::Memory;
pub use postgres::Postgres;

/// A connected document store.
///
/// ## Cloning
///
/// This type is cheaply cloneable; clones share the underlying connection
/// pool or in-memory state.
#[derive(Clone, Debug, From)]
pub enum Store {
    #[debug("{_0:?}")]
    Postgres(Postgres),

    #[debug("{_0:?}")]
    Memory(Memory),
}

impl Store {
    /// Database URL selecting the in-memory backend.
    pub const MEMORY_URL: &'static str = "memory://";

    /// Connect to the store at the URL.
    ///
    /// [`Store::MEMORY_URL`] creates a fresh in-memory store; anything else is
    /// treated as a Postgres connection string.
    #[tracing::instrument(name = "Store::connect", skip(url))]
    pub async fn connect(url: &str) -> Result<Self> {
        if url == Self::MEMORY_URL {
            tracing::warn!("using in-memory store; data will not be persisted");
            return Ok(Self::memory());
        }
        Postgres::connect(url)
            .await
            .context("connect to postgres")
            .map(Self::Postgres)
    }

    /// A fresh, empty in-memory store.
    pub fn memory() -> Self {
        Self::Memory(Memory::new())
    }

    /// Ensure the store is reachable.
    pub async fn ping(&self) -> Result<()> {
        match self {
            Store::Postgres(db) => db.ping().await,
            Store::Memory(db) => db.ping().await,
        }
    }

    /// Insert a document, returning the identifier the store generated for it.
    ///
    /// Identifiers are always generated by the store: a `_id` field in the
    /// document is discarded.
    pub async fn insert(&self, collection: Collection, mut document: Document) -> Result<DocumentId> {
        document.remove(field::ID);
        match self {
            Store::Postgres(db) => db.insert(collection, document).await,
            Store::Memory(db) => db.insert(collection, document).await,
        }
    }

    /// Read the documents selected by `find`.
    pub async fn find(&self, collection: Collection, find: &Find) -> Result<Vec<StoredDocument>> {
        match self {
            Store::Postgres(db) => db.find(collection, find).await,
            Store::Memory(db) => db.find(collection, find).await,
        }
    }

    /// Read the first document, in insertion order, matching the filter.
    pub async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>> {
        match self {
            Store::Postgres(db) => db.find_one(collection, filter).await,
            Store::Memory(db) => db.find_one(collection, filter).await,
        }
    }

    /// Apply updates to the document with the given id, all or nothing.
    ///
    /// Returns `false` if there is no such document.
    pub async fn update_one(
        &self,
        collection: Collection,
        id: DocumentId,
        updates: &[Update],
    ) -> Result<bool> {
        match self {
            Store::Postgres(db) => db.update_one(collection, id, updates).await,
            Store::Memory(db) => db.update_one(collection, id, updates).await,
        }
    }

    /// Delete the first document, in insertion order, matching the filter.
    ///
    /// Returns `false` if nothing matched.
    pub async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<bool> {
        match self {
            Store::Postgres(db) => db.delete_one(collection, filter).await,
            Store::Memory(db) => db.delete_one(collection, filter).await,
        }
    }
}
