use tracing::{info, warn};

use crate::ask::AskAnswer;

use super::{ControlError, PharmaControlPlane};

impl PharmaControlPlane {
    /// Answers a research question through the configured service.
    ///
    /// # Errors
    /// Returns `ControlError::Ask` for a blank question or a failed backend.
    pub async fn ask(&self, question: &str) -> Result<AskAnswer, ControlError> {
        match self.answers.ask(question).await {
            Ok(answer) => {
                info!(sources = answer.sources.len(), "question answered");
                Ok(answer)
            }
            Err(err) => {
                if !err.is_validation() {
                    warn!(error = %err, "question answering failed");
                }
                Err(err.into())
            }
        }
    }

    /// Example questions for the ask box, as offered by the answering service.
    pub fn suggested_questions(&self) -> Vec<String> {
        self.answers.suggested_questions()
    }
}
