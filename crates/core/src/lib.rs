//! `bss-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model, and the list query engine shared by
//! every catalog and CRM collection.

pub mod entity;
pub mod error;
pub mod id;
pub mod query;
pub mod serde_util;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use query::{ListQuery, Page, SearchScope, SortSpec};
