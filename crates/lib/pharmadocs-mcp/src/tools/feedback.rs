use pharmadocs_store::models::{FeedbackPatch, Preference, Rating};
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

/// Parameters for a feedback edit. Omitted fields keep their value.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateFeedbackParams {
    pub id: String,
    pub rating: Option<u8>,
    pub preference: Option<String>,
    pub comment: Option<String>,
}

impl UpdateFeedbackParams {
    fn into_patch(self) -> Result<(String, FeedbackPatch), ErrorData> {
        let mut patch = FeedbackPatch::default();
        if let Some(rating) = self.rating {
            let rating = Rating::new(rating).map_err(|err| helpers::invalid_params(err.to_string()))?;
            patch = patch.with_rating(rating);
        }
        if let Some(preference) = self.preference.as_deref() {
            let preference = preference
                .trim()
                .parse::<Preference>()
                .map_err(|err| helpers::invalid_params(err.to_string()))?;
            patch = patch.with_preference(preference);
        }
        if let Some(comment) = self.comment {
            patch = patch.with_comment(comment);
        }
        Ok((self.id, patch))
    }
}

/// Parameters for appending a comment.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AddCommentParams {
    pub id: String,
    pub text: String,
}

#[tool_router(router = tool_router_feedback, vis = "pub")]
impl PharmaMcp {
    #[tool(description = "Update rating, preference, or summary comment on a document.")]
    async fn update_feedback(
        &self,
        Parameters(params): Parameters<UpdateFeedbackParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let (id, patch) = params.into_patch()?;
        let document = self
            .control()
            .update_feedback(&id, patch)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(document)?]))
    }

    #[tool(description = "Append a comment to a document's discussion thread.")]
    async fn add_comment(
        &self,
        Parameters(params): Parameters<AddCommentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let document = self
            .control()
            .add_comment(&params.id, &params.text)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(document)?]))
    }
}
