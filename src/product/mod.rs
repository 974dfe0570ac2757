//! Products
//!
//! Multilingual product records, their image galleries, validation and
//! category-path filtering.

pub mod commands;
pub mod defaults;
pub mod draft;
pub mod image;
pub mod query;
pub mod record;

pub use commands::ProductCommandService;
pub use defaults::default_products;
pub use draft::{validate_product, ProductDraft, ProductPatch};
pub use image::ImageRef;
pub use query::{reassign_removed_category, relink_category, sort_for_display, ProductQuery};
pub use record::Product;
