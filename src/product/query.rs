//! Product filtering and category-path maintenance.
//!
//! Products reference categories by name path only. Matching a product to a
//! category compares whole path segments: either the exact path, or (when
//! descendants are requested) any path below it. No suffix or leaf-name
//! guessing is attempted.

use super::record::Product;
use crate::category::CategoryPath;
use crate::types::Language;

#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<CategoryPath>,
    /// Also match products filed anywhere below `category`
    pub include_descendants: bool,
    /// Case-insensitive substring over names and descriptions in all languages
    pub text: Option<String>,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_category(product) && self.matches_text(product)
    }

    fn matches_category(&self, product: &Product) -> bool {
        let Some(category) = &self.category else {
            return true;
        };
        product.all_categories().any(|path| {
            if self.include_descendants {
                path.starts_with(category)
            } else {
                path == category
            }
        })
    }

    fn matches_text(&self, product: &Product) -> bool {
        match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                product.name.contains_ignore_case(needle)
                    || product.description.contains_ignore_case(needle)
            }
        }
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Rewrite every category path starting with `old` to start with `new`.
/// Returns how many products changed.
pub fn relink_category(products: &mut [Product], old: &CategoryPath, new: &CategoryPath) -> usize {
    let mut changed = 0;
    for product in products.iter_mut() {
        let mut touched = false;
        if let Some(path) = product.category.replace_prefix(old, new) {
            product.category = path;
            touched = true;
        }
        for extra in product.additional_categories.iter_mut() {
            if let Some(path) = extra.replace_prefix(old, new) {
                *extra = path;
                touched = true;
            }
        }
        if touched {
            product.touch();
            changed += 1;
        }
    }
    changed
}

/// After deleting the subtree at `removed`, move products filed there to
/// `fallback` and drop additional categories pointing into it.
pub fn reassign_removed_category(
    products: &mut [Product],
    removed: &CategoryPath,
    fallback: &CategoryPath,
) -> usize {
    let mut changed = 0;
    for product in products.iter_mut() {
        let mut touched = false;
        if product.category.starts_with(removed) {
            product.category = fallback.clone();
            touched = true;
        }
        let before = product.additional_categories.len();
        product
            .additional_categories
            .retain(|path| !path.starts_with(removed));
        touched |= product.additional_categories.len() != before;
        if touched {
            product.touch();
            changed += 1;
        }
    }
    changed
}

/// Sort key used by listings: display name in `language`, then id.
pub fn sort_for_display(products: &mut [&Product], language: Language) {
    products.sort_by(|a, b| {
        a.name
            .display(language)
            .to_lowercase()
            .cmp(&b.name.display(language).to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}
