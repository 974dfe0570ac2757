//! Category hierarchy
//!
//! An immutable tree of named, iconed nodes addressed by id (stable) or by
//! name path (lossy). All transformations are pure and return a new snapshot.

pub mod commands;
pub mod defaults;
pub mod node;
pub mod path;
pub mod tree;

pub use commands::CategoryCommandService;
pub use defaults::{default_categories, uncategorized_path, UNCATEGORIZED_ID, UNCATEGORIZED_NAME};
pub use node::Category;
pub use path::{CategoryPath, PATH_SEPARATOR};
pub use tree::{CategoryTree, Edit, EditOutcome, Parent};
