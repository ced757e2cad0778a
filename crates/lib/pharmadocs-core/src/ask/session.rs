use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use super::{AskAnswer, AskError, QuestionAnsweringService, normalize_question};

/// Visible state of the ask box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AskState {
    #[default]
    Idle,
    Pending {
        seq: u64,
        question: String,
    },
    Answered {
        seq: u64,
        question: String,
        answer: AskAnswer,
    },
    Failed {
        seq: u64,
        question: String,
        message: String,
    },
}

impl AskState {
    #[must_use]
    pub const fn seq(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Pending { seq, .. } | Self::Answered { seq, .. } | Self::Failed { seq, .. } => {
                Some(*seq)
            }
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// State plus the sequence number of the most recently issued request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskSnapshot {
    pub latest_seq: u64,
    pub state: AskState,
}

/// Handle for an issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskTicket {
    seq: u64,
    question: String,
}

impl AskTicket {
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Ask state machine with cancellation by superseding.
///
/// Every submission takes the next sequence number. A resolution is applied
/// only while its sequence number is still the latest one issued; anything
/// older is dropped when it lands. In-flight work is not aborted.
#[derive(Clone)]
pub struct AskSession {
    service: Arc<dyn QuestionAnsweringService>,
    state: Arc<watch::Sender<AskSnapshot>>,
}

impl AskSession {
    #[must_use]
    pub fn new(service: Arc<dyn QuestionAnsweringService>) -> Self {
        let (state, _) = watch::channel(AskSnapshot::default());
        Self {
            service,
            state: Arc::new(state),
        }
    }

    /// Issues a request and moves to `Pending`.
    ///
    /// # Errors
    /// Returns `AskError::EmptyQuestion` for blank input; the state is left as is.
    pub fn submit(&self, question: &str) -> Result<AskTicket, AskError> {
        let question = normalize_question(question)?.to_string();
        let mut seq = 0;
        self.state.send_modify(|snapshot| {
            snapshot.latest_seq += 1;
            seq = snapshot.latest_seq;
            snapshot.state = AskState::Pending {
                seq,
                question: question.clone(),
            };
        });
        Ok(AskTicket { seq, question })
    }

    /// Runs the request for `ticket` and applies the outcome if it is still current.
    ///
    /// Returns the applied state, or `None` when a newer request superseded it.
    pub async fn resolve(&self, ticket: AskTicket) -> Option<AskState> {
        let AskTicket { seq, question } = ticket;
        let next = match self.service.ask(&question).await {
            Ok(answer) => AskState::Answered {
                seq,
                question,
                answer,
            },
            Err(err) => AskState::Failed {
                seq,
                question,
                message: err.to_string(),
            },
        };

        let applied = self.state.send_if_modified(|snapshot| {
            if snapshot.latest_seq != seq {
                return false;
            }
            snapshot.state = next.clone();
            true
        });

        if applied {
            Some(next)
        } else {
            warn!(seq, "dropping superseded ask resolution");
            None
        }
    }

    /// Submits and resolves in one step.
    ///
    /// # Errors
    /// Returns `AskError::EmptyQuestion` for blank input.
    pub async fn ask(&self, question: &str) -> Result<Option<AskState>, AskError> {
        let ticket = self.submit(question)?;
        Ok(self.resolve(ticket).await)
    }

    #[must_use]
    pub fn state(&self) -> AskState {
        self.state.borrow().state.clone()
    }

    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.state.borrow().latest_seq
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AskSnapshot> {
        self.state.subscribe()
    }
}
