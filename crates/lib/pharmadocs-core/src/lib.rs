//! Core types and services for pharmadocs.
//!
//! This crate owns the seeded document collection, the pure search filter and
//! feedback reducers applied to it, and the question-answering services behind
//! the ask box. The control plane ties them together for the HTTP and MCP
//! surfaces.

pub mod ask;
pub mod control;
pub mod feedback;
pub mod filter;
pub mod seed;
pub mod store;
