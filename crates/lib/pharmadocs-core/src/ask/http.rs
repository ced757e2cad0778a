use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AskAnswer, AskError, QuestionAnsweringService, normalize_question};

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Asks a remote `/api/ask` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAnsweringService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnsweringService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/api/ask", self.base_url)
    }
}

#[async_trait]
impl QuestionAnsweringService for HttpAnsweringService {
    async fn ask(&self, question: &str) -> Result<AskAnswer, AskError> {
        let question = normalize_question(question)?;
        let url = self.endpoint();
        debug!(%url, "sending ask request");

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(|err| {
                warn!(%url, error = %err, "ask request failed");
                AskError::Transport(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            warn!(%url, status = status.as_u16(), %message, "ask endpoint returned an error");
            return Err(AskError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<AskAnswer>()
            .await
            .map_err(|err| AskError::Decode(err.to_string()))
    }
}
