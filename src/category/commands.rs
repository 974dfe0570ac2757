//! Category command service: one entry point per category CLI command.
//!
//! Checks the session user's permissions, applies the pure tree edit, keeps
//! product category paths consistent where asked to, and persists.

use super::defaults::UNCATEGORIZED_ID;
use super::node::Category;
use super::path::{CategoryPath, PATH_SEPARATOR};
use super::tree::{CategoryTree, Edit, EditOutcome, Parent};
use crate::catalog::Catalog;
use crate::error::ApiError;
use crate::permission::{require_permission, Action, Resource};
use crate::product::{reassign_removed_category, relink_category, ProductQuery};
use crate::types::{new_id, CategoryId, Language};

pub struct CategoryCommandService;

/// Result of category list command.
#[derive(Debug, Clone)]
pub struct CategoryListResult {
    pub tree: CategoryTree,
    pub query: Option<String>,
    pub total: usize,
}

/// Result of category show command.
#[derive(Debug, Clone)]
pub struct CategoryShowResult {
    pub category: Category,
    pub path: CategoryPath,
    pub ancestor_ids: Vec<CategoryId>,
    /// Products filed exactly here
    pub direct_products: usize,
    /// Products filed here or anywhere below
    pub subtree_products: usize,
}

/// Result of category add command.
#[derive(Debug, Clone)]
pub struct CategoryAddResult {
    pub id: CategoryId,
    pub path: CategoryPath,
}

/// Result of category rename and move commands.
#[derive(Debug, Clone)]
pub struct CategoryRelocateResult {
    pub id: CategoryId,
    pub old_path: CategoryPath,
    pub new_path: CategoryPath,
    /// Products whose stored paths were rewritten
    pub relinked_products: usize,
    /// Products still filed under the old path
    pub stale_products: usize,
}

/// Result of category delete command.
#[derive(Debug, Clone)]
pub struct CategoryDeleteResult {
    pub id: CategoryId,
    pub path: CategoryPath,
    pub removed_nodes: usize,
    pub reassigned_products: usize,
}

impl CategoryCommandService {
    /// List the tree, optionally filtered by a name query.
    pub fn list(
        catalog: &Catalog,
        query: Option<&str>,
        language: Language,
    ) -> Result<CategoryListResult, ApiError> {
        require_permission(
            catalog.current_user(),
            Action::Read,
            Resource::Categories,
            Some(language),
        )?;
        let tree = match query {
            Some(q) => catalog.categories().filter_by_query(q),
            None => catalog.categories().clone(),
        };
        let total = tree.len();
        Ok(CategoryListResult {
            tree,
            query: query.map(str::to_string),
            total,
        })
    }

    /// Show one category addressed by id or, failing that, by name path.
    pub fn show(
        catalog: &Catalog,
        target: &str,
        language: Language,
    ) -> Result<CategoryShowResult, ApiError> {
        require_permission(
            catalog.current_user(),
            Action::Read,
            Resource::Categories,
            Some(language),
        )?;
        let tree = catalog.categories();
        let category = Self::resolve(tree, target)?;
        let path = tree
            .path_of(&category.id)
            .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", target)))?;
        let mut ancestor_ids = tree.find_by_id(&category.id).unwrap_or_default();
        ancestor_ids.pop();

        let direct_products = ProductQuery {
            category: Some(path.clone()),
            ..Default::default()
        }
        .apply(catalog.products())
        .len();
        let subtree_products = ProductQuery {
            category: Some(path.clone()),
            include_descendants: true,
            ..Default::default()
        }
        .apply(catalog.products())
        .len();

        Ok(CategoryShowResult {
            category: category.clone(),
            path,
            ancestor_ids,
            direct_products,
            subtree_products,
        })
    }

    /// Nodes from the root down to `id`.
    pub fn breadcrumb(
        catalog: &Catalog,
        id: &str,
        language: Language,
    ) -> Result<Vec<Category>, ApiError> {
        require_permission(
            catalog.current_user(),
            Action::Read,
            Resource::Categories,
            Some(language),
        )?;
        catalog
            .categories()
            .breadcrumb(id)
            .map(|trail| trail.into_iter().cloned().collect())
            .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", id)))
    }

    /// Add a category under `parent_id` (or at the top level).
    pub fn add(
        catalog: &mut Catalog,
        name: &str,
        parent_id: Option<&str>,
        icon: Option<&str>,
        id: Option<&str>,
        language: Language,
    ) -> Result<CategoryAddResult, ApiError> {
        require_permission(
            catalog.current_user(),
            Action::Create,
            Resource::Categories,
            Some(language),
        )?;
        let name = Self::validate_name(name)?;
        let id = match id.map(str::trim) {
            Some("") => {
                return Err(ApiError::ValidationError(
                    "Category id cannot be empty".to_string(),
                ))
            }
            Some(id) => id.to_string(),
            None => new_id(),
        };
        let tree = catalog.categories();
        if tree.contains(&id) {
            return Err(ApiError::Conflict(format!(
                "Category id already exists: {}",
                id
            )));
        }
        let parent = Parent::from_option(parent_id);
        Self::ensure_unique_sibling_name(tree, &parent, &name, None)?;

        let mut node = Category::new(id.clone(), name);
        if let Some(icon) = icon {
            node = node.with_icon(icon.trim());
        }
        let edit = tree.insert(&parent, node);
        let tree = Self::expect_changed(edit, parent_id.unwrap_or(&id))?;
        let path = tree.path_of(&id).unwrap_or_default();
        catalog.replace_categories(tree)?;
        tracing::info!(category_id = %id, path = %path, "category added");
        Ok(CategoryAddResult { id, path })
    }

    /// Rename a category; with `relink`, rewrite product paths that pointed
    /// at the old name path.
    pub fn rename(
        catalog: &mut Catalog,
        id: &str,
        name: &str,
        icon: Option<&str>,
        relink: bool,
        language: Language,
    ) -> Result<CategoryRelocateResult, ApiError> {
        require_permission(
            catalog.current_user(),
            Action::Update,
            Resource::Categories,
            Some(language),
        )?;
        let name = Self::validate_name(name)?;
        let tree = catalog.categories();
        let old_path = Self::path_or_error(tree, id)?;
        let mut crumbs = tree.find_by_id(id).unwrap_or_default();
        crumbs.pop();
        let parent = Parent::from_option(crumbs.last().map(String::as_str));
        Self::ensure_unique_sibling_name(tree, &parent, &name, Some(id))?;

        let edit = tree.rename(id, &name, icon.map(str::trim));
        let tree = Self::expect_changed(edit, id)?;
        Self::relocate(catalog, tree, id, old_path, relink)
    }

    /// Move a category subtree under another parent (or to the top level).
    pub fn move_to(
        catalog: &mut Catalog,
        id: &str,
        parent_id: Option<&str>,
        relink: bool,
        language: Language,
    ) -> Result<CategoryRelocateResult, ApiError> {
        require_permission(
            catalog.current_user(),
            Action::Update,
            Resource::Categories,
            Some(language),
        )?;
        let tree = catalog.categories();
        let old_path = Self::path_or_error(tree, id)?;
        let name = tree.get(id).map(|c| c.name.clone()).unwrap_or_default();
        let parent = Parent::from_option(parent_id);
        Self::ensure_unique_sibling_name(tree, &parent, &name, Some(id))?;

        let edit = tree.move_node(id, &parent);
        let tree = Self::expect_changed(edit, parent_id.unwrap_or(id))?;
        Self::relocate(catalog, tree, id, old_path, relink)
    }

    /// Delete a category and its subtree. Products filed there move to
    /// wherever the Uncategorized sentinel currently lives. The sentinel
    /// itself, and any ancestor of it, cannot be deleted.
    pub fn delete(
        catalog: &mut Catalog,
        id: &str,
        language: Language,
    ) -> Result<CategoryDeleteResult, ApiError> {
        require_permission(
            catalog.current_user(),
            Action::Delete,
            Resource::Categories,
            Some(language),
        )?;
        let tree = catalog.categories();
        let path = Self::path_or_error(tree, id)?;
        let removed = tree.get(id).map(|c| c.subtree_ids()).unwrap_or_default();
        if removed.contains(&UNCATEGORIZED_ID) {
            return Err(ApiError::Protected(if id == UNCATEGORIZED_ID {
                format!("Category '{}' cannot be deleted", UNCATEGORIZED_ID)
            } else {
                format!(
                    "Category '{}' contains '{}' and cannot be deleted",
                    id, UNCATEGORIZED_ID
                )
            }));
        }
        let removed_nodes = removed.len();
        let edit = tree.delete(id);
        let tree = Self::expect_changed(edit, id)?;

        let fallback = tree.path_of(UNCATEGORIZED_ID);
        let orphans = catalog.products().iter().any(|p| p.category.starts_with(&path));
        if orphans && fallback.is_none() {
            return Err(ApiError::Protected(format!(
                "Category '{}' is missing; products in '{}' have nowhere to go",
                UNCATEGORIZED_ID, path
            )));
        }
        let mut products = catalog.products().to_vec();
        let reassigned_products =
            reassign_removed_category(&mut products, &path, &fallback.unwrap_or_default());
        if reassigned_products > 0 {
            catalog.replace_categories_and_products(tree, products)?;
        } else {
            catalog.replace_categories(tree)?;
        }
        tracing::info!(
            category_id = %id,
            path = %path,
            removed_nodes,
            reassigned_products,
            "category deleted"
        );
        Ok(CategoryDeleteResult {
            id: id.to_string(),
            path,
            removed_nodes,
            reassigned_products,
        })
    }

    fn relocate(
        catalog: &mut Catalog,
        tree: CategoryTree,
        id: &str,
        old_path: CategoryPath,
        relink: bool,
    ) -> Result<CategoryRelocateResult, ApiError> {
        let new_path = tree.path_of(id).unwrap_or_default();
        let mut products = catalog.products().to_vec();
        let relinked_products = if relink && old_path != new_path {
            relink_category(&mut products, &old_path, &new_path)
        } else {
            0
        };
        let stale_products = if relink || old_path == new_path {
            0
        } else {
            ProductQuery {
                category: Some(old_path.clone()),
                include_descendants: true,
                ..Default::default()
            }
            .apply(&products)
            .len()
        };
        if relinked_products > 0 {
            catalog.replace_categories_and_products(tree, products)?;
        } else {
            catalog.replace_categories(tree)?;
        }
        if stale_products > 0 {
            tracing::warn!(
                category_id = %id,
                old_path = %old_path,
                stale_products,
                "products still reference the previous category path"
            );
        }
        tracing::info!(category_id = %id, old_path = %old_path, new_path = %new_path, "category relocated");
        Ok(CategoryRelocateResult {
            id: id.to_string(),
            old_path,
            new_path,
            relinked_products,
            stale_products,
        })
    }

    /// Resolve an id, or failing that a `/`-joined name path.
    fn resolve<'a>(tree: &'a CategoryTree, target: &str) -> Result<&'a Category, ApiError> {
        tree.get(target)
            .or_else(|| tree.find_by_category_path(&CategoryPath::parse(target)))
            .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", target)))
    }

    fn path_or_error(tree: &CategoryTree, id: &str) -> Result<CategoryPath, ApiError> {
        tree.path_of(id)
            .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", id)))
    }

    fn validate_name(name: &str) -> Result<String, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::ValidationError(
                "Category name cannot be empty".to_string(),
            ));
        }
        if name.contains(PATH_SEPARATOR) {
            return Err(ApiError::ValidationError(format!(
                "Category name cannot contain '{}': {}",
                PATH_SEPARATOR, name
            )));
        }
        Ok(name.to_string())
    }

    /// Sibling names must differ, otherwise name paths become ambiguous.
    fn ensure_unique_sibling_name(
        tree: &CategoryTree,
        parent: &Parent,
        name: &str,
        except_id: Option<&str>,
    ) -> Result<(), ApiError> {
        let siblings: &[Category] = match parent {
            Parent::Root => tree.roots(),
            Parent::Node(parent_id) => match tree.get(parent_id) {
                Some(node) => &node.children,
                None => return Ok(()),
            },
        };
        let clash = siblings
            .iter()
            .any(|c| c.name == name && Some(c.id.as_str()) != except_id);
        if clash {
            return Err(ApiError::Conflict(format!(
                "A sibling category is already named '{}'",
                name
            )));
        }
        Ok(())
    }

    fn expect_changed(edit: Edit, id: &str) -> Result<CategoryTree, ApiError> {
        match edit.outcome {
            EditOutcome::Changed => Ok(edit.tree),
            EditOutcome::NotFound => {
                Err(ApiError::NotFound(format!("Category not found: {}", id)))
            }
            EditOutcome::DuplicateId => Err(ApiError::Conflict(format!(
                "Category id already exists: {}",
                id
            ))),
            EditOutcome::WouldCycle => Err(ApiError::ValidationError(format!(
                "Cannot move a category into its own subtree: {}",
                id
            ))),
        }
    }
}
