//! In-process document store.

use std::{collections::HashMap, sync::Arc};

use clients::easel::Document;
use color_eyre::Result;
use derive_more::Debug;
use tokio::sync::RwLock;

use super::{Collection, DocumentId, Filter, Find, StoredDocument, Update};

/// A document store held entirely in memory.
///
/// Nothing is persisted: the contents are lost when the last clone is
/// dropped. Collections keep documents in insertion order.
#[derive(Clone, Debug, Default)]
#[debug("Memory")]
pub struct Memory {
    collections: Arc<RwLock<HashMap<Collection, Vec<StoredDocument>>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(name = "Memory::ping")]
    pub async fn ping(&self) -> Result<()> {
        let _ = self.collections.read().await;
        Ok(())
    }

    #[tracing::instrument(name = "Memory::insert", skip(document))]
    pub async fn insert(&self, collection: Collection, document: Document) -> Result<DocumentId> {
        let id = DocumentId::generate();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .push(StoredDocument {
                id,
                fields: document,
            });
        Ok(id)
    }

    #[tracing::instrument(name = "Memory::find")]
    pub async fn find(&self, collection: Collection, find: &Find) -> Result<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        let mut documents = collections
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|document| find.filter.matches(document))
            .cloned()
            .collect::<Vec<_>>();

        if let Some(sort) = &find.sort {
            documents.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some(limit) = find.limit {
            documents.truncate(limit);
        }

        Ok(documents)
    }

    #[tracing::instrument(name = "Memory::find_one")]
    pub async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>> {
        let collections = self.collections.read().await;
        let document = collections
            .get(&collection)
            .and_then(|documents| documents.iter().find(|document| filter.matches(document)))
            .cloned();
        Ok(document)
    }

    #[tracing::instrument(name = "Memory::update_one")]
    pub async fn update_one(
        &self,
        collection: Collection,
        id: DocumentId,
        updates: &[Update],
    ) -> Result<bool> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(&collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.id == id));
        match document {
            Some(document) => {
                Update::apply_all(updates, &mut document.fields)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[tracing::instrument(name = "Memory::delete_one")]
    pub async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<bool> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        match documents.iter().position(|document| filter.matches(document)) {
            Some(index) => {
                documents.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
