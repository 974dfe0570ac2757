//! Product record and its image gallery.

use super::image::ImageRef;
use crate::category::CategoryPath;
use crate::error::ApiError;
use crate::types::{LocalizedText, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product. `category` is a name path into the category tree; the
/// command layer checks that it resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
    pub category: CategoryPath,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_categories: Vec<CategoryPath>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    /// Index into `images` of the image shown first
    #[serde(default)]
    pub current_image: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn current_image(&self) -> Option<&ImageRef> {
        self.images.get(self.current_image)
    }

    /// Every category path the product is filed under, primary first.
    pub fn all_categories(&self) -> impl Iterator<Item = &CategoryPath> {
        std::iter::once(&self.category).chain(self.additional_categories.iter())
    }

    pub fn add_image(&mut self, image: ImageRef) {
        self.images.push(image);
        self.touch();
    }

    /// Remove the image at `index`, keeping `current_image` on the same
    /// picture when possible and in range otherwise.
    pub fn remove_image(&mut self, index: usize) -> Result<ImageRef, ApiError> {
        self.check_image_index(index)?;
        let removed = self.images.remove(index);
        if index < self.current_image {
            self.current_image -= 1;
        }
        if self.current_image >= self.images.len() {
            self.current_image = self.images.len().saturating_sub(1);
        }
        self.touch();
        Ok(removed)
    }

    pub fn select_image(&mut self, index: usize) -> Result<(), ApiError> {
        self.check_image_index(index)?;
        self.current_image = index;
        self.touch();
        Ok(())
    }

    /// Step the current image forwards (or backwards) cyclically.
    pub fn cycle_image(&mut self, forward: bool) -> Option<usize> {
        let count = self.images.len();
        if count == 0 {
            return None;
        }
        self.current_image = if forward {
            (self.current_image + 1) % count
        } else {
            (self.current_image + count - 1) % count
        };
        Some(self.current_image)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn check_image_index(&self, index: usize) -> Result<(), ApiError> {
        if index >= self.images.len() {
            return Err(ApiError::NotFound(format!(
                "Product {} has no image #{} ({} image(s))",
                self.id,
                index,
                self.images.len()
            )));
        }
        Ok(())
    }
}
