//! MCP tool modules.
//!
//! Tools are grouped by concern: document lookup, feedback edits, and the
//! ask box.

pub mod ask;
pub mod documents;
pub mod feedback;
