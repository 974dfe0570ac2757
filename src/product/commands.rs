//! Product command service.

use super::draft::{ProductDraft, ProductPatch};
use super::image::ImageRef;
use super::query::{sort_for_display, ProductQuery};
use super::record::Product;
use crate::catalog::Catalog;
use crate::category::{CategoryPath, CategoryTree};
use crate::error::ApiError;
use crate::permission::{require_permission, Action, Resource};
use crate::types::{Language, ProductId};

pub struct ProductCommandService;

/// Result of product list command.
#[derive(Debug, Clone)]
pub struct ProductListResult {
    pub products: Vec<Product>,
    pub total: usize,
}

/// Result of product edit command.
#[derive(Debug, Clone)]
pub struct ProductEditResult {
    pub product: Product,
    /// Languages whose texts changed
    pub languages: Vec<Language>,
    pub non_text_changed: bool,
}

/// Result of the image gallery commands.
#[derive(Debug, Clone)]
pub struct ProductImageResult {
    pub product_id: ProductId,
    pub images: Vec<ImageRef>,
    pub current_image: usize,
    /// Image added or removed by the command, if any
    pub affected: Option<ImageRef>,
}

impl ProductImageResult {
    fn from_product(product: &Product, affected: Option<ImageRef>) -> Self {
        Self {
            product_id: product.id.clone(),
            images: product.images.clone(),
            current_image: product.current_image,
            affected,
        }
    }
}

impl ProductCommandService {
    /// List products matching `query`, sorted by their name in `language`.
    pub fn list(
        catalog: &Catalog,
        query: &ProductQuery,
        language: Language,
    ) -> Result<ProductListResult, ApiError> {
        require_permission(
            catalog.current_user(),
            Action::Read,
            Resource::Products,
            Some(language),
        )?;
        let mut matched = query.apply(catalog.products());
        sort_for_display(&mut matched, language);
        let products: Vec<Product> = matched.into_iter().cloned().collect();
        let total = products.len();
        Ok(ProductListResult { products, total })
    }

    pub fn show(catalog: &Catalog, id: &str, language: Language) -> Result<Product, ApiError> {
        require_permission(
            catalog.current_user(),
            Action::Read,
            Resource::Products,
            Some(language),
        )?;
        catalog.product_or_error(id).cloned()
    }

    pub fn add(catalog: &mut Catalog, draft: ProductDraft) -> Result<Product, ApiError> {
        require_permission(catalog.current_user(), Action::Create, Resource::Products, None)?;
        if let Some(id) = &draft.id {
            if catalog.product(id).is_some() {
                return Err(ApiError::Conflict(format!("Product already exists: {}", id)));
            }
        }
        Self::ensure_categories_exist(
            catalog.categories(),
            std::iter::once(&draft.category).chain(draft.additional_categories.iter()),
        )?;
        let product = draft.into_product()?;

        let mut products = catalog.products().to_vec();
        products.push(product.clone());
        catalog.replace_products(products)?;
        tracing::info!(product_id = %product.id, category = %product.category, "product added");
        Ok(product)
    }

    /// Apply `patch`. Every language whose texts change is authorized on its
    /// own; other fields need an unscoped update grant.
    pub fn edit(
        catalog: &mut Catalog,
        id: &str,
        patch: &ProductPatch,
    ) -> Result<ProductEditResult, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::ValidationError(
                "Nothing to update: pass at least one field".to_string(),
            ));
        }
        let user = catalog.current_user();
        let languages: Vec<Language> = patch.text_languages().into_iter().collect();
        for language in &languages {
            require_permission(user, Action::Update, Resource::Products, Some(*language))?;
        }
        let non_text_changed = patch.touches_non_text();
        if non_text_changed {
            require_permission(user, Action::Update, Resource::Products, None)?;
        }

        let current = catalog.product_or_error(id)?;
        if let Some(category) = &patch.category {
            Self::ensure_categories_exist(catalog.categories(), std::iter::once(category))?;
        }
        if let Some(additional) = &patch.additional_categories {
            Self::ensure_categories_exist(catalog.categories(), additional.iter())?;
        }
        let updated = patch.apply(current)?;

        Self::store(catalog, updated.clone())?;
        tracing::info!(product_id = %id, ?languages, non_text_changed, "product updated");
        Ok(ProductEditResult {
            product: updated,
            languages,
            non_text_changed,
        })
    }

    pub fn delete(catalog: &mut Catalog, id: &str) -> Result<Product, ApiError> {
        require_permission(catalog.current_user(), Action::Delete, Resource::Products, None)?;
        let removed = catalog.product_or_error(id)?.clone();
        let products: Vec<Product> = catalog
            .products()
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        catalog.replace_products(products)?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(removed)
    }

    /// Add an image (URL or local file) to the end of the gallery.
    pub fn add_image(
        catalog: &mut Catalog,
        id: &str,
        source: &str,
    ) -> Result<ProductImageResult, ApiError> {
        Self::update_gallery(catalog, id, |product| {
            let image = ImageRef::ingest(source)?;
            product.add_image(image.clone());
            Ok(Some(image))
        })
    }

    pub fn remove_image(
        catalog: &mut Catalog,
        id: &str,
        index: usize,
    ) -> Result<ProductImageResult, ApiError> {
        Self::update_gallery(catalog, id, |product| product.remove_image(index).map(Some))
    }

    pub fn select_image(
        catalog: &mut Catalog,
        id: &str,
        index: usize,
    ) -> Result<ProductImageResult, ApiError> {
        Self::update_gallery(catalog, id, |product| {
            product.select_image(index)?;
            Ok(None)
        })
    }

    /// Step to the next (or previous) image, wrapping around.
    pub fn step_image(
        catalog: &mut Catalog,
        id: &str,
        forward: bool,
    ) -> Result<ProductImageResult, ApiError> {
        Self::update_gallery(catalog, id, |product| match product.cycle_image(forward) {
            Some(_) => Ok(None),
            None => Err(ApiError::NotFound(format!(
                "Product {} has no images",
                product.id
            ))),
        })
    }

    fn update_gallery<F>(
        catalog: &mut Catalog,
        id: &str,
        change: F,
    ) -> Result<ProductImageResult, ApiError>
    where
        F: FnOnce(&mut Product) -> Result<Option<ImageRef>, ApiError>,
    {
        require_permission(catalog.current_user(), Action::Update, Resource::Products, None)?;
        let mut product = catalog.product_or_error(id)?.clone();
        let affected = change(&mut product)?;
        let result = ProductImageResult::from_product(&product, affected);
        Self::store(catalog, product)?;
        tracing::info!(product_id = %id, images = result.images.len(), current = result.current_image, "product gallery updated");
        Ok(result)
    }

    fn store(catalog: &mut Catalog, product: Product) -> Result<(), ApiError> {
        let products: Vec<Product> = catalog
            .products()
            .iter()
            .map(|p| {
                if p.id == product.id {
                    product.clone()
                } else {
                    p.clone()
                }
            })
            .collect();
        catalog.replace_products(products)
    }

    fn ensure_categories_exist<'a>(
        tree: &CategoryTree,
        paths: impl Iterator<Item = &'a CategoryPath>,
    ) -> Result<(), ApiError> {
        for path in paths {
            if path.is_empty() {
                continue;
            }
            if tree.find_by_category_path(path).is_none() {
                return Err(ApiError::NotFound(format!("Category path not found: {}", path)));
            }
        }
        Ok(())
    }
}
