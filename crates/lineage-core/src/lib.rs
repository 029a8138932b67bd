//! Domain types for the Lineage family tree: members, relationship types,
//! relationships, the inverse-resolution rules, and the [`store::FamilyStore`]
//! trait that storage backends implement.
//!
//! No HTTP or database code lives here.

pub mod error;
pub mod inverse;
pub mod member;
pub mod relationship;
pub mod store;

pub use error::{Error, Result};
