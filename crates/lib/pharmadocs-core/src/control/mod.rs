use std::{error::Error, fmt, sync::Arc};

use pharmadocs_store::models::User;

use crate::ask::{AskError, QuestionAnsweringService};
use crate::seed::{SeedData, SeedError};
use crate::store::{InMemoryDocStore, StoreError};

pub mod ask;
pub mod documents;
pub mod feedback;

#[derive(Debug)]
pub enum ControlError {
    NotFound(String),
    Store(StoreError),
    Ask(AskError),
    Seed(SeedError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Ask(err) => write!(f, "{err}"),
            Self::Seed(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControlError {}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other @ StoreError::InvalidInput(_) => Self::Store(other),
        }
    }
}

impl From<AskError> for ControlError {
    fn from(err: AskError) -> Self {
        Self::Ask(err)
    }
}

impl From<SeedError> for ControlError {
    fn from(err: SeedError) -> Self {
        Self::Seed(err)
    }
}

/// Entry point shared by the HTTP and MCP surfaces.
///
/// Every edit is attributed to the session's current user.
pub struct PharmaControlPlane {
    store: InMemoryDocStore,
    answers: Arc<dyn QuestionAnsweringService>,
    editor: User,
}

impl Clone for PharmaControlPlane {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            answers: self.answers.clone(),
            editor: self.editor.clone(),
        }
    }
}

impl PharmaControlPlane {
    /// Seeds a store and resolves the current user.
    ///
    /// # Errors
    /// Returns `ControlError::Seed` if the seed's current user is unknown.
    pub fn new(
        seed: SeedData,
        answers: Arc<dyn QuestionAnsweringService>,
    ) -> Result<Self, ControlError> {
        let editor = seed.current_user()?.clone();
        Ok(Self {
            store: InMemoryDocStore::new(seed),
            answers,
            editor,
        })
    }

    pub const fn current_user(&self) -> &User {
        &self.editor
    }
}
