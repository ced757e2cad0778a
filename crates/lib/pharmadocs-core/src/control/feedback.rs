use chrono::{DateTime, Utc};
use pharmadocs_store::models::{Document, FeedbackPatch, Preference};
use tracing::info;

use crate::feedback::{add_comment, apply_feedback, toggle_preference};

use super::{ControlError, PharmaControlPlane};

impl PharmaControlPlane {
    /// Merges a feedback patch into a document as the current user.
    /// An empty patch is not an edit and returns the document as is.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if the document does not exist.
    pub async fn update_feedback(
        &self,
        id: &str,
        patch: FeedbackPatch,
    ) -> Result<Document, ControlError> {
        self.update_feedback_at(id, patch, Utc::now()).await
    }

    /// Same as `update_feedback` with a caller-supplied edit time.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if the document does not exist.
    pub async fn update_feedback_at(
        &self,
        id: &str,
        patch: FeedbackPatch,
        now: DateTime<Utc>,
    ) -> Result<Document, ControlError> {
        if patch.is_empty() {
            return self.get_document(id).await;
        }
        let editor = &self.editor;
        let updated = self
            .store
            .update_document(id, |current| apply_feedback(current, patch, editor, now))
            .await?;
        info!(document = %updated.id, editor = %editor.id, "feedback updated");
        Ok(updated)
    }

    /// Toggles a preference: choosing the active one clears it.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if the document does not exist.
    pub async fn set_preference(
        &self,
        id: &str,
        preference: Preference,
    ) -> Result<Document, ControlError> {
        self.set_preference_at(id, preference, Utc::now()).await
    }

    /// Same as `set_preference` with a caller-supplied edit time.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if the document does not exist.
    pub async fn set_preference_at(
        &self,
        id: &str,
        preference: Preference,
        now: DateTime<Utc>,
    ) -> Result<Document, ControlError> {
        let editor = &self.editor;
        Ok(self
            .store
            .update_document(id, |current| {
                let next = toggle_preference(current.feedback.preference, preference);
                apply_feedback(
                    current,
                    FeedbackPatch::default().with_preference(next),
                    editor,
                    now,
                )
            })
            .await?)
    }

    /// Appends a comment by the current user. Blank text leaves the document as is.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if the document does not exist.
    pub async fn add_comment(&self, id: &str, text: &str) -> Result<Document, ControlError> {
        self.add_comment_at(id, text, Utc::now()).await
    }

    /// Same as `add_comment` with a caller-supplied creation time.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if the document does not exist.
    pub async fn add_comment_at(
        &self,
        id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Document, ControlError> {
        if text.trim().is_empty() {
            return self.get_document(id).await;
        }
        let editor = &self.editor;
        Ok(self
            .store
            .update_document(id, |current| add_comment(current, text, editor, now))
            .await?)
    }
}
