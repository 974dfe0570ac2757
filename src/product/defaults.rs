//! Sample products loaded when nothing is persisted yet.

use super::draft::ProductDraft;
use super::image::ImageRef;
use super::record::Product;
use crate::category::CategoryPath;
use crate::types::LocalizedText;

pub fn default_products() -> Vec<Product> {
    let drafts = vec![
        ProductDraft {
            id: Some("prod-headphones".to_string()),
            name: LocalizedText::new(
                "Беспроводные наушники",
                "Wireless Headphones",
                "无线耳机",
            ),
            description: LocalizedText::new(
                "Наушники с активным шумоподавлением",
                "Over-ear headphones with active noise cancelling",
                "主动降噪头戴式耳机",
            ),
            price: 129.0,
            quantity: 25,
            category: CategoryPath::parse("Electronics/Audio/Headphones"),
            additional_categories: Vec::new(),
            images: vec![ImageRef::Url(
                "https://images.example.com/headphones.jpg".to_string(),
            )],
        },
        ProductDraft {
            id: Some("prod-speaker".to_string()),
            name: LocalizedText::new("Портативная колонка", "Portable Speaker", "便携音箱"),
            description: LocalizedText::new(
                "Водонепроницаемая колонка",
                "Waterproof bluetooth speaker",
                "防水蓝牙音箱",
            ),
            price: 59.9,
            quantity: 40,
            category: CategoryPath::parse("Electronics/Audio/Speakers"),
            additional_categories: Vec::new(),
            images: Vec::new(),
        },
        ProductDraft {
            id: Some("prod-kettle".to_string()),
            name: LocalizedText::new("Электрический чайник", "Electric Kettle", "电水壶"),
            description: LocalizedText::new(
                "Чайник из нержавеющей стали, 1.7 л",
                "Stainless steel kettle, 1.7 l",
                "不锈钢电水壶，1.7升",
            ),
            price: 34.5,
            quantity: 12,
            category: CategoryPath::parse("Home/Kitchen"),
            additional_categories: vec![CategoryPath::parse("Electronics")],
            images: Vec::new(),
        },
    ];
    drafts
        .into_iter()
        .filter_map(|draft| draft.into_product().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::default_categories;

    #[test]
    fn test_default_products_resolve_against_default_tree() {
        let products = default_products();
        assert_eq!(products.len(), 3);
        let tree = default_categories();
        for product in &products {
            assert!(
                tree.find_by_category_path(&product.category).is_some(),
                "{} is filed under unknown path {}",
                product.id,
                product.category
            );
        }
    }
}
