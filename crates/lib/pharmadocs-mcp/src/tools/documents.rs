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

/// Parameters for searching documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchDocumentsParams {
    pub query: Option<String>,
    pub tag_ids: Option<Vec<String>>,
}

/// Parameters for fetching a document by id.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetDocumentParams {
    pub id: String,
}

#[tool_router(router = tool_router_documents, vis = "pub")]
impl PharmaMcp {
    #[tool(description = "Search documents by text (title, short summary, tag labels) and tag ids.")]
    async fn search_documents(
        &self,
        Parameters(params): Parameters<SearchDocumentsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let query = params.query.unwrap_or_default();
        let tag_ids = params.tag_ids.unwrap_or_default();
        let documents = self.control().search_documents(&query, &tag_ids).await;
        Ok(CallToolResult::success(vec![Content::json(documents)?]))
    }

    #[tool(description = "Fetch a document by id.")]
    async fn get_document(
        &self,
        Parameters(params): Parameters<GetDocumentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let document = self
            .control()
            .get_document(&params.id)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(document)?]))
    }

    #[tool(description = "List the tag catalog (id, label, type, description).")]
    async fn list_tags(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(
            self.control().list_tags(),
        )?]))
    }

    #[tool(description = "List the molecule catalog (id, name, SMILES, formula).")]
    async fn list_molecules(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(
            self.control().list_molecules(),
        )?]))
    }
}
