//! Store interfaces and the in-memory implementation.
//!
//! The store owns the session's document collection and the read-only seed
//! catalogs. Writes go through pure reducers and swap whole snapshots.

pub mod memory;

pub use memory::{InMemoryDocStore, StoreError, StoreResult};
