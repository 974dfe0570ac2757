//! Category node type.

use crate::types::CategoryId;
use serde::{Deserialize, Serialize};

/// A named, optionally iconed node in the category hierarchy.
///
/// `id` is the stable address of the node. `name` is the display label and
/// doubles as the path segment in a [`CategoryPath`](super::CategoryPath).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Symbolic icon name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
            children: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Category>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of this node's own fields with a replacement child list.
    pub(crate) fn rebuilt(&self, children: Vec<Category>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            children,
        }
    }

    /// Ids of this node and every descendant, depth-first.
    pub fn subtree_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.id.as_str()];
        for child in &self.children {
            ids.extend(child.subtree_ids());
        }
        ids
    }
}
