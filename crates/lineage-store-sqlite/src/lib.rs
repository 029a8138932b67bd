//! SQLite backend for the Lineage family-tree store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Relationship writes and their derived
//! inverse rows are applied in one transaction by the relationship writer.

mod catalog;
mod encode;
mod schema;
mod store;
mod writer;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
