//! Built-in category hierarchy used when nothing is persisted yet.

use super::node::Category;
use super::path::CategoryPath;
use super::tree::CategoryTree;

/// Id of the sentinel category that products fall back to. It cannot be deleted.
pub const UNCATEGORIZED_ID: &str = "uncategorized";

/// Display name (and path) of the sentinel category.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

pub fn uncategorized_path() -> CategoryPath {
    CategoryPath::parse(UNCATEGORIZED_NAME)
}

pub fn default_categories() -> CategoryTree {
    CategoryTree::new(vec![
        Category::new("electronics", "Electronics")
            .with_icon("cpu")
            .with_children(vec![
                Category::new("audio", "Audio")
                    .with_icon("headphones")
                    .with_children(vec![
                        Category::new("headphones", "Headphones"),
                        Category::new("speakers", "Speakers"),
                    ]),
                Category::new("phones", "Phones").with_icon("smartphone"),
                Category::new("computers", "Computers")
                    .with_icon("laptop")
                    .with_children(vec![
                        Category::new("laptops", "Laptops"),
                        Category::new("accessories", "Accessories"),
                    ]),
            ]),
        Category::new("home", "Home")
            .with_icon("home")
            .with_children(vec![
                Category::new("kitchen", "Kitchen"),
                Category::new("furniture", "Furniture"),
            ]),
        Category::new("clothing", "Clothing")
            .with_icon("shirt")
            .with_children(vec![
                Category::new("men", "Men"),
                Category::new("women", "Women"),
            ]),
        Category::new(UNCATEGORIZED_ID, UNCATEGORIZED_NAME).with_icon("folder"),
    ])
}
