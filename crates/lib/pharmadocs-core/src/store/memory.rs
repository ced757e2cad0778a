use std::{error::Error, fmt, sync::Arc};

use pharmadocs_store::models::{Document, Molecule, Tag, User};
use tokio::sync::RwLock;

use crate::filter::DocumentFilter;
use crate::seed::SeedData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    InvalidInput(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only seed catalogs.
#[derive(Debug)]
struct Catalog {
    tags: Vec<Tag>,
    users: Vec<User>,
    molecules: Vec<Molecule>,
}

/// Session document collection.
///
/// Documents sit behind a single `RwLock`; updates run the reducer and swap
/// the stored snapshot while holding the write guard, so readers never see a
/// half-applied edit.
pub struct InMemoryDocStore {
    documents: Arc<RwLock<Vec<Document>>>,
    catalog: Arc<Catalog>,
}

impl Clone for InMemoryDocStore {
    fn clone(&self) -> Self {
        Self {
            documents: self.documents.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

impl InMemoryDocStore {
    #[must_use]
    pub fn new(seed: SeedData) -> Self {
        let SeedData {
            users,
            molecules,
            tags,
            documents,
            ..
        } = seed;
        Self {
            documents: Arc::new(RwLock::new(documents)),
            catalog: Arc::new(Catalog {
                tags,
                users,
                molecules,
            }),
        }
    }

    /// Lists every document in collection order.
    pub async fn list_documents(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    /// Fetches a document by id.
    ///
    /// # Errors
    /// Returns `StoreError::InvalidInput` if the id is blank.
    pub async fn get_document(&self, id: &str) -> StoreResult<Option<Document>> {
        let id = ensure_non_empty(id, "id")?;
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|document| document.id == id).cloned())
    }

    /// Returns the documents accepted by `filter`, in collection order.
    pub async fn search_documents(&self, filter: &DocumentFilter) -> Vec<Document> {
        let documents = self.documents.read().await;
        filter.apply(&documents).into_iter().cloned().collect()
    }

    /// Replaces a document with `update(current)` under one write lock.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no document has `id`, or
    /// `StoreError::InvalidInput` if the update changes the document id.
    pub async fn update_document<F>(&self, id: &str, update: F) -> StoreResult<Document>
    where
        F: FnOnce(&Document) -> Document,
    {
        let id = ensure_non_empty(id, "id")?;
        let mut documents = self.documents.write().await;
        let slot = documents
            .iter_mut()
            .find(|document| document.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let next = update(&*slot);
        if next.id != slot.id {
            return Err(StoreError::InvalidInput(format!(
                "update changed document id from {} to {}",
                slot.id, next.id
            )));
        }
        *slot = next.clone();
        Ok(next)
    }

    #[must_use]
    pub fn list_tags(&self) -> &[Tag] {
        &self.catalog.tags
    }

    #[must_use]
    pub fn list_users(&self) -> &[User] {
        &self.catalog.users
    }

    #[must_use]
    pub fn list_molecules(&self) -> &[Molecule] {
        &self.catalog.molecules
    }
}

fn ensure_non_empty<'a>(value: &'a str, field: &str) -> StoreResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmadocs_store::models::Preference;

    fn store() -> InMemoryDocStore {
        InMemoryDocStore::new(SeedData::demo())
    }

    #[tokio::test]
    async fn get_document_handles_missing_and_blank_ids() {
        let store = store();
        assert!(store.get_document("doc-2").await.expect("lookup").is_some());
        assert!(store.get_document("doc-404").await.expect("lookup").is_none());
        assert!(matches!(
            store.get_document("  ").await,
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn update_swaps_snapshot_visible_to_clones() {
        let store = store();
        let reader = store.clone();

        let updated = store
            .update_document("doc-3", |document| {
                let mut next = document.clone();
                next.feedback.preference = Preference::Maybe;
                next
            })
            .await
            .expect("update");

        assert_eq!(updated.feedback.preference, Preference::Maybe);
        let seen = reader
            .get_document("doc-3")
            .await
            .expect("lookup")
            .expect("doc-3 exists");
        assert_eq!(seen, updated);
    }

    #[tokio::test]
    async fn update_of_missing_document_is_not_found() {
        let err = store()
            .update_document("doc-9", Clone::clone)
            .await
            .expect_err("missing document");
        assert_eq!(err, StoreError::NotFound("doc-9".to_string()));
    }

    #[tokio::test]
    async fn update_cannot_rename_a_document() {
        let store = store();
        let err = store
            .update_document("doc-1", |document| {
                let mut next = document.clone();
                next.id = "doc-99".to_string();
                next
            })
            .await
            .expect_err("id change is rejected");
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert!(store.get_document("doc-1").await.expect("lookup").is_some());
    }

    #[test]
    fn catalogs_come_from_seed() {
        let store = store();
        assert_eq!(store.list_tags().len(), 6);
        assert_eq!(store.list_users().len(), 3);
        assert_eq!(store.list_molecules().len(), 5);
    }
}
