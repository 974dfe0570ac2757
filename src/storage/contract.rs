use crate::error::StorageError;
use std::fmt;

/// Fixed keys under which catalog state is persisted, one JSON blob each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Products,
    Categories,
    Users,
    Auth,
}

impl StateKey {
    pub const ALL: [StateKey; 4] = [
        StateKey::Products,
        StateKey::Categories,
        StateKey::Users,
        StateKey::Auth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StateKey::Products => "products",
            StateKey::Categories => "categories",
            StateKey::Users => "catalog_users",
            StateKey::Auth => "catalog_auth",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-blob key/value persistence. Every write replaces the previous blob;
/// there are no partial updates or transactions.
pub trait StateStore: Send + Sync {
    /// Raw blob for `key`, or None when nothing is stored.
    fn load(&self, key: StateKey) -> Result<Option<String>, StorageError>;
    fn save(&self, key: StateKey, blob: &str) -> Result<(), StorageError>;
    fn clear(&self, key: StateKey) -> Result<(), StorageError>;
    /// Human-readable location, for status output.
    fn location(&self) -> String;
}
