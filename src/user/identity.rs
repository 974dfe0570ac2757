//! Catalog user identity.

use crate::permission::{Grant, Role};
use crate::types::{new_id, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique login name
    pub username: String,
    pub display_name: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(username: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: new_id(),
            username: username.into(),
            display_name: display_name.into(),
            role,
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<UserId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn grants(&self) -> Vec<Grant> {
        self.role.grants()
    }
}
