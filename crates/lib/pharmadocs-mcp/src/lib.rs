//! MCP server implementation for pharmadocs.
//!
//! This crate wires the control plane into rmcp tool handlers so agents can
//! search the document collection, leave feedback, and ask research questions.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use pharmadocs_core::control::PharmaControlPlane;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

pub use tools::ask::AskQuestionParams;
pub use tools::documents::{GetDocumentParams, SearchDocumentsParams};
pub use tools::feedback::{AddCommentParams, UpdateFeedbackParams};

const SERVER_INSTRUCTIONS: &str = r"pharmadocs exposes a curated set of preclinical tuberculosis research documents.

Workflow:
1. Find documents with `search_documents` (free-text `query` over title, short summary and tag
   labels; optional `tag_ids`, any of which may match). Use `list_tags` to discover tag ids
   and `list_molecules` for the compound catalog.
2. Read a full record with `get_document`.
3. Record feedback as the session user:
   - `update_feedback` sets any of `rating` (0-5), `preference` (like, dislike, maybe, none)
     and `comment`.
   - `add_comment` appends to the discussion thread.
4. `ask_question` returns an answer with the documents it cites; `suggested_questions` lists
   good starting points.

Notes:
- Matching is case-insensitive and ignores surrounding whitespace.
- Every feedback edit updates `lastEditedBy` and `lastEditedAt`.
- `health` returns `ok`.";

/// MCP server wrapper around the shared control plane.
#[derive(Clone)]
pub struct PharmaMcp {
    tool_router: ToolRouter<Self>,
    control: Arc<PharmaControlPlane>,
}

impl PharmaMcp {
    /// Creates a new server owning the control plane.
    #[must_use]
    pub fn new(control: PharmaControlPlane) -> Self {
        Self::with_control(Arc::new(control))
    }

    /// Creates a new server using a shared control plane handle.
    #[must_use]
    pub fn with_control(control: Arc<PharmaControlPlane>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_documents()
            + Self::tool_router_feedback()
            + Self::tool_router_ask();
        Self {
            tool_router,
            control,
        }
    }

    pub(crate) fn control(&self) -> &PharmaControlPlane {
        &self.control
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl PharmaMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for PharmaMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
