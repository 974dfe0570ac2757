//! Persisted state
//!
//! Catalog state is kept as plain JSON blobs under fixed keys, read once at
//! startup and rewritten in full on every change. Last writer wins.

pub mod contract;
pub mod file;
pub mod memory;

pub use contract::{StateKey, StateStore};
pub use file::FileStateStore;
pub use memory::MemoryStateStore;
