//! Category tree snapshot and its pure transformations.
//!
//! Every edit returns a freshly rebuilt [`CategoryTree`] inside an [`Edit`];
//! the receiver is never mutated, so the pre- and post-edit snapshots never
//! alias. Edits on missing ids do not fail: they hand back an unchanged copy
//! together with an [`EditOutcome`] saying why nothing happened.

use super::node::Category;
use super::path::CategoryPath;
use crate::types::CategoryId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Where a new or moved node is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    Root,
    Node(CategoryId),
}

impl Parent {
    pub fn from_option(parent_id: Option<&str>) -> Self {
        match parent_id {
            Some(id) => Parent::Node(id.to_string()),
            None => Parent::Root,
        }
    }
}

/// Why an edit did or did not change the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Changed,
    /// The target or parent id does not occur in the tree
    NotFound,
    /// An inserted id already occurs in the tree
    DuplicateId,
    /// A node would become its own descendant
    WouldCycle,
}

/// Result of a tree edit: the new snapshot and what happened.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub tree: CategoryTree,
    pub outcome: EditOutcome,
}

impl Edit {
    fn changed(tree: CategoryTree) -> Self {
        Self {
            tree,
            outcome: EditOutcome::Changed,
        }
    }

    fn unchanged(tree: &CategoryTree, outcome: EditOutcome) -> Self {
        Self {
            tree: tree.clone(),
            outcome,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.outcome == EditOutcome::Changed
    }
}

/// The whole category hierarchy: an ordered sequence of root nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTree {
    roots: Vec<Category>,
}

impl CategoryTree {
    pub fn new(roots: Vec<Category>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Category] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<Category> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.walk().len()
    }

    /// Depth-first pre-order listing of `(depth, node)`.
    pub fn walk(&self) -> Vec<(usize, &Category)> {
        fn visit<'a>(nodes: &'a [Category], depth: usize, out: &mut Vec<(usize, &'a Category)>) {
            for node in nodes {
                out.push((depth, node));
                visit(&node.children, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        visit(&self.roots, 0, &mut out);
        out
    }

    pub fn contains(&self, id: &str) -> bool {
        self.walk().iter().any(|(_, node)| node.id == id)
    }

    /// Ids that occur on more than one node, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<CategoryId> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for (_, node) in self.walk() {
            if !seen.insert(node.id.as_str()) && !duplicates.contains(&node.id) {
                duplicates.push(node.id.clone());
            }
        }
        duplicates
    }

    /// Node with the given id, searched depth-first.
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.breadcrumb(id).and_then(|trail| trail.last().copied())
    }

    /// Walk `segments` top-down by exact name; the first sibling with a
    /// matching name wins. An empty path addresses nothing.
    pub fn find_by_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Category> {
        let mut level: &[Category] = &self.roots;
        let mut found = None;
        for segment in segments {
            let node = level.iter().find(|c| c.name == segment.as_ref())?;
            found = Some(node);
            level = &node.children;
        }
        found
    }

    pub fn find_by_category_path(&self, path: &CategoryPath) -> Option<&Category> {
        self.find_by_path(path.segments())
    }

    /// Ids from the root down to and including `id`.
    pub fn find_by_id(&self, id: &str) -> Option<Vec<CategoryId>> {
        self.breadcrumb(id)
            .map(|trail| trail.into_iter().map(|node| node.id.clone()).collect())
    }

    /// Nodes from the root down to and including `id`.
    pub fn breadcrumb(&self, id: &str) -> Option<Vec<&Category>> {
        fn trail<'a>(nodes: &'a [Category], id: &str, acc: &mut Vec<&'a Category>) -> bool {
            for node in nodes {
                acc.push(node);
                if node.id == id || trail(&node.children, id, acc) {
                    return true;
                }
                acc.pop();
            }
            false
        }
        let mut acc = Vec::new();
        if trail(&self.roots, id, &mut acc) {
            Some(acc)
        } else {
            None
        }
    }

    /// Name path of `id`. Lossy: see [`CategoryPath`].
    pub fn path_of(&self, id: &str) -> Option<CategoryPath> {
        self.breadcrumb(id)
            .map(|trail| CategoryPath::from_segments(trail.iter().map(|node| node.name.as_str())))
    }

    /// Append `node` to the end of `parent`'s children (or to the roots).
    pub fn insert(&self, parent: &Parent, node: Category) -> Edit {
        if node.subtree_ids().iter().any(|id| self.contains(id)) {
            return Edit::unchanged(self, EditOutcome::DuplicateId);
        }
        match parent {
            Parent::Root => {
                let mut roots = self.roots.clone();
                roots.push(node);
                Edit::changed(CategoryTree::new(roots))
            }
            Parent::Node(parent_id) => {
                let rebuilt = replace_node(&self.roots, parent_id, &mut |current: &Category| {
                    let mut children = current.children.clone();
                    children.push(node.clone());
                    current.rebuilt(children)
                });
                match rebuilt {
                    Some(roots) => Edit::changed(CategoryTree::new(roots)),
                    None => Edit::unchanged(self, EditOutcome::NotFound),
                }
            }
        }
    }

    /// Replace the name of `id`, and its icon when `icon` is given. Children
    /// are untouched.
    pub fn rename(&self, id: &str, name: &str, icon: Option<&str>) -> Edit {
        let rebuilt = replace_node(&self.roots, id, &mut |current: &Category| {
            let mut renamed = current.clone();
            renamed.name = name.to_string();
            if let Some(icon) = icon {
                renamed.icon = Some(icon.to_string());
            }
            renamed
        });
        match rebuilt {
            Some(roots) => Edit::changed(CategoryTree::new(roots)),
            None => Edit::unchanged(self, EditOutcome::NotFound),
        }
    }

    /// Remove every node with `id` together with its subtree.
    pub fn delete(&self, id: &str) -> Edit {
        let (roots, removed) = remove_node(&self.roots, id);
        if removed {
            Edit::changed(CategoryTree::new(roots))
        } else {
            Edit::unchanged(self, EditOutcome::NotFound)
        }
    }

    /// Detach the subtree rooted at `id` and append it under `parent`.
    pub fn move_node(&self, id: &str, parent: &Parent) -> Edit {
        let Some(node) = self.get(id) else {
            return Edit::unchanged(self, EditOutcome::NotFound);
        };
        if let Parent::Node(parent_id) = parent {
            if node.subtree_ids().contains(&parent_id.as_str()) {
                return Edit::unchanged(self, EditOutcome::WouldCycle);
            }
            if !self.contains(parent_id) {
                return Edit::unchanged(self, EditOutcome::NotFound);
            }
        }
        let node = node.clone();
        let detached = self.delete(id);
        let attached = detached.tree.insert(parent, node);
        if attached.is_changed() {
            attached
        } else {
            Edit::unchanged(self, attached.outcome)
        }
    }

    /// Case-insensitive substring filter on names. A node survives when its
    /// own name matches or any descendant survives; survivors keep only their
    /// surviving descendants.
    pub fn filter_by_query(&self, query: &str) -> CategoryTree {
        fn filter(nodes: &[Category], needle: &str) -> Vec<Category> {
            nodes
                .iter()
                .filter_map(|node| {
                    let children = filter(&node.children, needle);
                    if node.name.to_lowercase().contains(needle) || !children.is_empty() {
                        Some(node.rebuilt(children))
                    } else {
                        None
                    }
                })
                .collect()
        }
        CategoryTree::new(filter(&self.roots, &query.to_lowercase()))
    }
}

/// Rebuild `nodes` with the first node carrying `id` replaced by `f(node)`.
/// Only the path from the root to the target is reconstructed.
fn replace_node(
    nodes: &[Category],
    id: &str,
    f: &mut dyn FnMut(&Category) -> Category,
) -> Option<Vec<Category>> {
    for (index, current) in nodes.iter().enumerate() {
        let replacement = if current.id == id {
            Some(f(current))
        } else {
            replace_node(&current.children, id, f).map(|children| current.rebuilt(children))
        };
        if let Some(replacement) = replacement {
            let mut rebuilt = nodes.to_vec();
            rebuilt[index] = replacement;
            return Some(rebuilt);
        }
    }
    None
}

fn remove_node(nodes: &[Category], id: &str) -> (Vec<Category>, bool) {
    let mut removed = false;
    let kept = nodes
        .iter()
        .filter_map(|node| {
            if node.id == id {
                removed = true;
                return None;
            }
            let (children, removed_below) = remove_node(&node.children, id);
            removed |= removed_below;
            Some(node.rebuilt(children))
        })
        .collect();
    (kept, removed)
}
