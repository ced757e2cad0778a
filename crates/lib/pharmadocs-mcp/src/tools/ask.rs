use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::PharmaMcp;
use crate::helpers;

/// Parameters for a research question.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AskQuestionParams {
    pub question: String,
}

#[tool_router(router = tool_router_ask, vis = "pub")]
impl PharmaMcp {
    #[tool(description = "Ask a research question. Returns an answer and the documents it cites.")]
    async fn ask_question(
        &self,
        Parameters(params): Parameters<AskQuestionParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let answer = self
            .control()
            .ask(&params.question)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(answer)?]))
    }

    #[tool(description = "List example research questions for ask_question.")]
    async fn suggested_questions(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(
            self.control().suggested_questions(),
        )?]))
    }
}
