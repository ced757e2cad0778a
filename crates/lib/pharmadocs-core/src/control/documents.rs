use pharmadocs_store::models::{Document, Molecule, Tag, User};
use tracing::debug;

use crate::filter::DocumentFilter;

use super::{ControlError, PharmaControlPlane};

impl PharmaControlPlane {
    /// Lists every document in collection order.
    pub async fn list_documents(&self) -> Vec<Document> {
        self.store.list_documents().await
    }

    /// Searches documents by free text and selected tag ids.
    pub async fn search_documents(&self, query: &str, tag_ids: &[String]) -> Vec<Document> {
        let filter = DocumentFilter::new()
            .with_query(query)
            .with_tags(tag_ids.iter().cloned());
        self.search(&filter).await
    }

    /// Applies a prepared filter.
    pub async fn search(&self, filter: &DocumentFilter) -> Vec<Document> {
        let results = self.store.search_documents(filter).await;
        debug!(
            query = filter.query(),
            tags = filter.tag_ids().len(),
            matches = results.len(),
            "document search"
        );
        results
    }

    /// Fetches a document by id.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if no document has `id`, or
    /// `ControlError::Store` for a blank id.
    pub async fn get_document(&self, id: &str) -> Result<Document, ControlError> {
        self.store
            .get_document(id)
            .await?
            .ok_or_else(|| ControlError::NotFound(id.to_string()))
    }

    pub fn list_tags(&self) -> Vec<Tag> {
        self.store.list_tags().to_vec()
    }

    pub fn list_users(&self) -> Vec<User> {
        self.store.list_users().to_vec()
    }

    pub fn list_molecules(&self) -> Vec<Molecule> {
        self.store.list_molecules().to_vec()
    }
}
