//! Catalog Admin: multi-language product catalog administration
//!
//! A category tree with pure, snapshot-returning edits, multilingual product
//! records, and a role-based permission predicate, all persisted as JSON blobs
//! in a local data directory.

pub mod catalog;
pub mod category;
pub mod config;
pub mod error;
pub mod logging;
pub mod permission;
pub mod product;
pub mod storage;
pub mod tooling;
pub mod types;
pub mod user;

pub use catalog::Catalog;
pub use error::{ApiError, StorageError};
pub use permission::{has_permission, Action, Grant, Resource, Role};
pub use types::{Language, LocalizedText};
