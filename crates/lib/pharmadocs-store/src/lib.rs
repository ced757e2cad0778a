//! Storage models and schema helpers for pharmadocs.
//!
//! This crate defines the canonical record shapes shared by the core
//! reducers, the HTTP API, and the MCP tool surface. Field names on the wire
//! are camelCase and must stay stable for existing consumers.

pub mod models;
pub mod schema;

pub use models::*;
