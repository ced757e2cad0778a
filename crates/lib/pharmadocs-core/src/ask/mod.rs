//! Question answering behind the ask box.
//!
//! `QuestionAnsweringService` is the seam between callers and whatever answers
//! the question. The bundled implementations are lookups with a simulated
//! delay or a round-trip to a companion server; `AskSession` layers the
//! superseding request state machine on top of any of them.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod canned;
mod http;
mod session;

pub use canned::{
    CannedAnswerService, FixedAnswerService, DEFAULT_ASK_DELAY, FALLBACK_ANSWER, SUGGESTED_QUESTIONS,
};
pub use http::HttpAnsweringService;
pub use session::{AskSession, AskSnapshot, AskState, AskTicket};

/// Document cited by an answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskSource {
    pub id: String,
    pub title: String,
}

impl AskSource {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<AskSource>,
}

impl AskAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sources(mut self, sources: Vec<AskSource>) -> Self {
        self.sources = sources;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    EmptyQuestion,
    Transport(String),
    Status { status: u16, message: String },
    Decode(String),
}

impl AskError {
    /// True for input the caller should not have submitted.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyQuestion)
    }
}

impl fmt::Display for AskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyQuestion => write!(f, "Question is required"),
            Self::Transport(message) => write!(f, "{message}"),
            Self::Status { message, .. } => write!(f, "{message}"),
            Self::Decode(message) => write!(f, "invalid answer payload: {message}"),
        }
    }
}

impl Error for AskError {}

#[async_trait]
pub trait QuestionAnsweringService: Send + Sync {
    /// Answers a free-text question.
    ///
    /// # Errors
    /// Returns `AskError::EmptyQuestion` for blank input, or a transport error
    /// from implementations that leave the process.
    async fn ask(&self, question: &str) -> Result<AskAnswer, AskError>;

    /// Example questions worth offering to the user. Empty by default.
    fn suggested_questions(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Trims `question`, rejecting blank input.
///
/// # Errors
/// Returns `AskError::EmptyQuestion` when nothing is left after trimming.
pub fn normalize_question(question: &str) -> Result<&str, AskError> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(AskError::EmptyQuestion);
    }
    Ok(trimmed)
}
