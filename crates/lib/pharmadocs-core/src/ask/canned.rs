use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{AskAnswer, AskError, AskSource, QuestionAnsweringService, normalize_question};

pub const FALLBACK_ANSWER: &str = "No mock answer available for that question.";
pub const DEFAULT_ASK_DELAY: Duration = Duration::from_millis(700);

/// Research questions the built-in table answers.
pub const SUGGESTED_QUESTIONS: [&str; 3] = [
    "What models was BTZ-043 tested on?",
    "List all studies targeting InhA",
    "Show me molecules effective against MDR-TB",
];

const FIXED_ANSWER: &str = "BTZ-043 showed bactericidal activity in mice.";

/// Exact-match lookup table with a simulated thinking delay.
#[derive(Debug, Clone)]
pub struct CannedAnswerService {
    answers: HashMap<String, AskAnswer>,
    questions: Vec<String>,
    fallback: String,
    delay: Duration,
}

impl CannedAnswerService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            questions: Vec::new(),
            fallback: FALLBACK_ANSWER.to_string(),
            delay: DEFAULT_ASK_DELAY,
        }
    }

    /// Table with the suggested research questions.
    #[must_use]
    pub fn builtin() -> Self {
        let [btz_models, inha_studies, mdr_tb] = SUGGESTED_QUESTIONS;
        Self::new()
            .with_answer(
                btz_models,
                AskAnswer::new("BTZ-043 was tested in murine models using BALB/c mice."),
            )
            .with_answer(
                inha_studies,
                AskAnswer::new("BTZ-043 and related analog studies target InhA."),
            )
            .with_answer(
                mdr_tb,
                AskAnswer::new("BTZ-043 showed high efficacy in MDR-TB models."),
            )
    }

    /// Registers an answer. The key is trimmed; lookups are otherwise exact.
    #[must_use]
    pub fn with_answer(mut self, question: impl Into<String>, answer: AskAnswer) -> Self {
        let question = question.into().trim().to_string();
        if self.answers.insert(question.clone(), answer).is_none() {
            self.questions.push(question);
        }
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Resolves an answer without waiting.
    ///
    /// # Errors
    /// Returns `AskError::EmptyQuestion` for blank input.
    pub fn lookup(&self, question: &str) -> Result<AskAnswer, AskError> {
        let question = normalize_question(question)?;
        Ok(self
            .answers
            .get(question)
            .cloned()
            .unwrap_or_else(|| AskAnswer::new(self.fallback.clone())))
    }
}

impl Default for CannedAnswerService {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait]
impl QuestionAnsweringService for CannedAnswerService {
    async fn ask(&self, question: &str) -> Result<AskAnswer, AskError> {
        let answer = self.lookup(question)?;
        debug!(question = question.trim(), "answering from canned table");
        simulate_delay(self.delay).await;
        Ok(answer)
    }

    /// Known questions in registration order.
    fn suggested_questions(&self) -> Vec<String> {
        self.questions.clone()
    }
}

/// One answer for every question, as the companion demo server does.
#[derive(Debug, Clone)]
pub struct FixedAnswerService {
    answer: AskAnswer,
    delay: Duration,
}

impl FixedAnswerService {
    #[must_use]
    pub fn new(answer: AskAnswer) -> Self {
        Self {
            answer,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for FixedAnswerService {
    fn default() -> Self {
        Self::new(AskAnswer::new(FIXED_ANSWER).with_sources(vec![
            AskSource::new("doc-1", "Preclinical Evaluation of BTZ-043 Against MDR-TB"),
            AskSource::new("doc-3", "Murine TB Model Efficacy Studies"),
        ]))
    }
}

#[async_trait]
impl QuestionAnsweringService for FixedAnswerService {
    async fn ask(&self, question: &str) -> Result<AskAnswer, AskError> {
        normalize_question(question)?;
        simulate_delay(self.delay).await;
        Ok(self.answer.clone())
    }

    fn suggested_questions(&self) -> Vec<String> {
        SUGGESTED_QUESTIONS.iter().map(ToString::to_string).collect()
    }
}

async fn simulate_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn known_question_returns_canned_answer_after_delay() {
        let service = CannedAnswerService::builtin();
        let started = tokio::time::Instant::now();
        let answer = service
            .ask("What models was BTZ-043 tested on?")
            .await
            .expect("known question");
        assert_eq!(answer.answer, "BTZ-043 was tested in murine models using BALB/c mice.");
        assert!(answer.sources.is_empty());
        assert!(started.elapsed() >= DEFAULT_ASK_DELAY);
    }

    #[tokio::test]
    async fn lookup_trims_but_does_not_normalize_case() {
        let service = CannedAnswerService::builtin().with_delay(Duration::ZERO);
        let trimmed = service
            .ask("  List all studies targeting InhA \n")
            .await
            .expect("trimmed question");
        assert_eq!(trimmed.answer, "BTZ-043 and related analog studies target InhA.");

        let lowered = service
            .ask("list all studies targeting inha")
            .await
            .expect("unknown question still answers");
        assert_eq!(lowered.answer, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn unknown_question_gets_fallback() {
        let service = CannedAnswerService::builtin()
            .with_delay(Duration::ZERO)
            .with_fallback("Sorry, I don't have an answer for that yet.");
        let answer = service.ask("unknown question").await.expect("fallback answer");
        assert_eq!(answer.answer, "Sorry, I don't have an answer for that yet.");
    }

    #[tokio::test]
    async fn blank_question_fails_fast() {
        let service = CannedAnswerService::builtin();
        assert_eq!(service.ask("   ").await, Err(AskError::EmptyQuestion));
        assert_eq!(FixedAnswerService::default().ask("").await, Err(AskError::EmptyQuestion));
    }

    #[test]
    fn suggestions_keep_registration_order() {
        let service = CannedAnswerService::builtin();
        assert_eq!(
            service.suggested_questions(),
            [
                "What models was BTZ-043 tested on?",
                "List all studies targeting InhA",
                "Show me molecules effective against MDR-TB",
            ]
        );
        assert_eq!(
            FixedAnswerService::default().suggested_questions(),
            SUGGESTED_QUESTIONS
        );

        let custom = CannedAnswerService::new()
            .with_answer(" Is DprE1 essential? ", AskAnswer::new("Yes."))
            .with_answer("Is DprE1 essential?", AskAnswer::new("Still yes."));
        assert_eq!(custom.suggested_questions(), ["Is DprE1 essential?"]);
    }

    #[tokio::test]
    async fn fixed_service_ignores_question_text() {
        let service = FixedAnswerService::default();
        let first = service.ask("What is BTZ-043?").await.expect("answer");
        let second = service.ask("anything else").await.expect("answer");
        assert_eq!(first, second);
        assert_eq!(first.answer, FIXED_ANSWER);
        let ids: Vec<_> = first.sources.iter().map(|source| source.id.as_str()).collect();
        assert_eq!(ids, ["doc-1", "doc-3"]);
    }
}
