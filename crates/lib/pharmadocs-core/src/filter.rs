//! Free-text and tag filtering over the document collection.
//!
//! Filtering is pure and order-preserving: no ranking is applied, and an empty
//! query or empty tag selection lets every document through.

use std::collections::BTreeSet;

use pharmadocs_store::models::Document;

/// Search state for the document listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    query: String,
    tag_ids: BTreeSet<String>,
}

impl DocumentFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tag_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_ids = tag_ids
            .into_iter()
            .map(Into::into)
            .map(|id: String| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        self
    }

    /// Selects a tag if it is not selected yet, otherwise deselects it.
    pub fn toggle_tag(&mut self, tag_id: &str) {
        if !self.tag_ids.remove(tag_id) {
            self.tag_ids.insert(tag_id.to_string());
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn tag_ids(&self) -> &BTreeSet<String> {
        &self.tag_ids
    }

    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.query.trim().is_empty() && self.tag_ids.is_empty()
    }

    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        let needle = self.query.trim().to_lowercase();
        matches_query(document, &needle) && self.matches_tags(document)
    }

    /// Returns the matching documents in their original order.
    #[must_use]
    pub fn apply<'a>(&self, documents: &'a [Document]) -> Vec<&'a Document> {
        if self.is_pass_through() {
            return documents.iter().collect();
        }
        documents
            .iter()
            .filter(|document| self.matches(document))
            .collect()
    }

    fn matches_tags(&self, document: &Document) -> bool {
        self.tag_ids.is_empty() || self.tag_ids.iter().any(|id| document.has_tag(id))
    }
}

/// Filters `documents` by query text and selected tag ids.
#[must_use]
pub fn filter_documents<'a>(
    documents: &'a [Document],
    query: &str,
    tag_ids: &[String],
) -> Vec<&'a Document> {
    DocumentFilter::new()
        .with_query(query)
        .with_tags(tag_ids.iter().cloned())
        .apply(documents)
}

fn matches_query(document: &Document, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    contains_folded(&document.title, needle)
        || contains_folded(&document.short_summary, needle)
        || document
            .tags
            .iter()
            .any(|tag| contains_folded(&tag.label, needle))
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
