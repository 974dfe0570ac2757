//! Product creation drafts, partial updates and required-field validation.

use super::image::ImageRef;
use super::record::Product;
use crate::category::CategoryPath;
use crate::error::ApiError;
use crate::types::{new_id, Language, LocalizedText};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

/// Validate the fields every stored product must carry.
pub fn validate_product(product: &Product) -> Result<(), ApiError> {
    let mut missing = Vec::new();
    if product.name.is_blank() {
        missing.push("name (at least one language)");
    }
    if product.category.is_empty() {
        missing.push("category");
    }
    if !product.price.is_finite() || product.price < 0.0 {
        missing.push("price (non-negative number)");
    }
    if !missing.is_empty() {
        return Err(ApiError::ValidationError(format!(
            "Fill required fields: {}",
            missing.join(", ")
        )));
    }
    if !product.images.is_empty() && product.current_image >= product.images.len() {
        return Err(ApiError::ValidationError(format!(
            "Current image #{} is out of range ({} image(s))",
            product.current_image,
            product.images.len()
        )));
    }
    Ok(())
}

/// Input for a new product.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub id: Option<String>,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub price: f64,
    pub quantity: u32,
    pub category: CategoryPath,
    pub additional_categories: Vec<CategoryPath>,
    pub images: Vec<ImageRef>,
}

impl ProductDraft {
    pub fn into_product(self) -> Result<Product, ApiError> {
        let now = Utc::now();
        let product = Product {
            id: self.id.unwrap_or_else(new_id),
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            category: self.category,
            additional_categories: self.additional_categories,
            images: self.images,
            current_image: 0,
            created_at: now,
            updated_at: now,
        };
        validate_product(&product)?;
        Ok(product)
    }
}

/// Partial update of a product. Text fields are keyed per language so each
/// language edit can be authorized on its own.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub names: BTreeMap<Language, String>,
    pub descriptions: BTreeMap<Language, String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
    pub category: Option<CategoryPath>,
    pub additional_categories: Option<Vec<CategoryPath>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.text_languages().is_empty() && !self.touches_non_text()
    }

    /// Languages whose texts this patch rewrites.
    pub fn text_languages(&self) -> BTreeSet<Language> {
        self.names
            .keys()
            .chain(self.descriptions.keys())
            .copied()
            .collect()
    }

    /// True when the patch changes anything besides translated texts.
    pub fn touches_non_text(&self) -> bool {
        self.price.is_some()
            || self.quantity.is_some()
            || self.category.is_some()
            || self.additional_categories.is_some()
    }

    /// Apply to a copy of `product`, validating the result.
    pub fn apply(&self, product: &Product) -> Result<Product, ApiError> {
        let mut updated = product.clone();
        for (language, text) in &self.names {
            updated.name.set(*language, text.clone());
        }
        for (language, text) in &self.descriptions {
            updated.description.set(*language, text.clone());
        }
        if let Some(price) = self.price {
            updated.price = price;
        }
        if let Some(quantity) = self.quantity {
            updated.quantity = quantity;
        }
        if let Some(category) = &self.category {
            updated.category = category.clone();
        }
        if let Some(additional) = &self.additional_categories {
            updated.additional_categories = additional.clone();
        }
        validate_product(&updated)?;
        updated.touch();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: LocalizedText::new("Чайник", "Kettle", "水壶"),
            price: 25.5,
            quantity: 4,
            category: CategoryPath::parse("Home/Kitchen"),
            ..Default::default()
        }
    }

    #[test]
    fn test_draft_requires_fields() {
        let err = ProductDraft::default().into_product().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name"), "{}", message);
        assert!(message.contains("category"), "{}", message);

        let mut negative = draft();
        negative.price = -1.0;
        assert!(negative.into_product().is_err());

        let mut nan = draft();
        nan.price = f64::NAN;
        assert!(nan.into_product().is_err());

        let product = draft().into_product().unwrap();
        assert!(!product.id.is_empty());
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn test_patch_languages_and_scope() {
        let mut patch = ProductPatch::default();
        assert!(patch.is_empty());
        patch.names.insert(Language::Zh, "电水壶".to_string());
        patch.descriptions.insert(Language::Ru, "Стальной".to_string());
        assert_eq!(
            patch.text_languages().into_iter().collect::<Vec<_>>(),
            vec![Language::Ru, Language::Zh]
        );
        assert!(!patch.touches_non_text());
        patch.quantity = Some(0);
        assert!(patch.touches_non_text());
    }

    #[test]
    fn test_patch_apply_validates() {
        let product = draft().into_product().unwrap();
        let mut patch = ProductPatch::default();
        patch.names.insert(Language::En, "Electric kettle".to_string());
        patch.price = Some(30.0);
        let updated = patch.apply(&product).unwrap();
        assert_eq!(updated.name.en, "Electric kettle");
        assert_eq!(updated.name.ru, "Чайник");
        assert_eq!(updated.price, 30.0);
        assert_eq!(product.price, 25.5);

        let mut blanking = ProductPatch::default();
        for language in Language::ALL {
            blanking.names.insert(language, String::new());
        }
        assert!(blanking.apply(&product).is_err());
    }
}
