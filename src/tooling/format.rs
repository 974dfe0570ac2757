//! Human-readable text output for the catalog commands.

use crate::category::commands::{CategoryListResult, CategoryShowResult};
use crate::category::Category;
use crate::permission::Grant;
use crate::product::commands::ProductImageResult;
use crate::product::Product;
use crate::types::Language;
use crate::user::commands::WhoAmIResult;
use crate::user::User;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Catalog status snapshot shown by `catalog status`.
#[derive(Debug, Clone)]
pub struct CatalogStatus {
    pub location: String,
    pub language: Language,
    pub username: Option<String>,
    pub role: Option<String>,
    pub categories: usize,
    pub products: usize,
    pub users: usize,
}

pub fn format_status_text(status: &CatalogStatus) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Catalog Status"));
    out.push_str(&format!("  Data dir: {}\n", status.location));
    out.push_str(&format!("  Language: {}\n", status.language));
    match (&status.username, &status.role) {
        (Some(user), Some(role)) => out.push_str(&format!("  Logged in: {} ({})\n", user, role)),
        _ => out.push_str("  Logged in: no\n"),
    }
    out.push('\n');
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Collection", "Count"]);
    table.add_row(vec!["Categories".to_string(), status.categories.to_string()]);
    table.add_row(vec!["Products".to_string(), status.products.to_string()]);
    table.add_row(vec!["Users".to_string(), status.users.to_string()]);
    out.push_str(&format!("{}\n", table));
    out
}

fn format_category_line(depth: usize, node: &Category) -> String {
    let icon = node
        .icon
        .as_deref()
        .map(|i| format!("[{}] ", i))
        .unwrap_or_default();
    format!(
        "{}{}{} {}",
        "  ".repeat(depth),
        icon,
        node.name,
        format!("({})", node.id).dimmed()
    )
}

pub fn format_category_list_text(result: &CategoryListResult) -> String {
    if result.tree.is_empty() {
        return match &result.query {
            Some(q) => format!("No categories match '{}'.", q),
            None => "No categories.".to_string(),
        };
    }
    let mut out = format!("{}\n\n", format_section_heading("Categories"));
    for (depth, node) in result.tree.walk() {
        out.push_str(&format_category_line(depth, node));
        out.push('\n');
    }
    out.push_str(&format!("\nTotal: {} categor(ies)", result.total));
    out
}

pub fn format_category_show_text(result: &CategoryShowResult) -> String {
    let category = &result.category;
    let mut out = format!("Category: {}\n", category.name);
    out.push_str(&format!("ID: {}\n", category.id));
    out.push_str(&format!("Path: {}\n", result.path));
    if let Some(icon) = &category.icon {
        out.push_str(&format!("Icon: {}\n", icon));
    }
    if !result.ancestor_ids.is_empty() {
        out.push_str(&format!("Ancestors: {}\n", result.ancestor_ids.join(" > ")));
    }
    out.push_str(&format!(
        "Products: {} here, {} including subcategories\n",
        result.direct_products, result.subtree_products
    ));
    if !category.children.is_empty() {
        out.push_str("Children:\n");
        for child in &category.children {
            out.push_str(&format!("  {}\n", format_category_line(0, child)));
        }
    }
    out
}

pub fn format_breadcrumb_text(trail: &[Category]) -> String {
    trail
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

pub fn format_product_list_text(products: &[Product], language: Language) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["ID", "Name", "Price", "Qty", "Category", "Images"]);
    for product in products {
        table.add_row(vec![
            product.id.clone(),
            product.name.display(language).to_string(),
            format!("{:.2}", product.price),
            product.quantity.to_string(),
            product.category.to_string(),
            product.images.len().to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} product(s)", table, products.len())
}

pub fn format_product_show_text(product: &Product, language: Language) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(product.name.display(language))
    );
    out.push_str(&format!("ID: {}\n", product.id));
    out.push_str(&format!("Price: {:.2}\n", product.price));
    out.push_str(&format!("Quantity: {}\n", product.quantity));
    out.push_str(&format!("Category: {}\n", product.category));
    for extra in &product.additional_categories {
        out.push_str(&format!("Also in: {}\n", extra));
    }
    out.push_str(&format!("Created: {}\n", product.created_at.to_rfc3339()));
    out.push_str(&format!("Updated: {}\n\n", product.updated_at.to_rfc3339()));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Lang", "Name", "Description"]);
    for lang in Language::ALL {
        table.add_row(vec![
            lang.code().to_string(),
            product.name.get(lang).to_string(),
            product.description.get(lang).to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));

    if !product.images.is_empty() {
        out.push_str("\nImages:\n");
        for (index, image) in product.images.iter().enumerate() {
            let marker = if index == product.current_image { "*" } else { " " };
            out.push_str(&format!("  {} #{} {}\n", marker, index, image.display_source()));
        }
    }
    out
}

pub fn format_gallery_text(result: &ProductImageResult) -> String {
    let mut out = format!("Product {}: {} image(s)\n", result.product_id, result.images.len());
    for (index, image) in result.images.iter().enumerate() {
        let marker = if index == result.current_image { "*" } else { " " };
        out.push_str(&format!("  {} #{} {}\n", marker, index, image.display_source()));
    }
    out
}

pub fn format_user_list_text(users: &[User]) -> String {
    if users.is_empty() {
        return "No users.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Username", "Display name", "Role", "Active", "Created"]);
    for user in users {
        table.add_row(vec![
            user.username.clone(),
            user.display_name.clone(),
            user.role.to_string(),
            if user.active { "yes" } else { "no" }.to_string(),
            user.created_at.format("%Y-%m-%d").to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} user(s)", table, users.len())
}

fn format_grant(grant: &Grant) -> String {
    match grant.language {
        Some(language) => format!("{} {} ({})", grant.action, grant.resource, language),
        None => format!("{} {}", grant.action, grant.resource),
    }
}

pub fn format_whoami_text(result: &WhoAmIResult) -> String {
    let Some(user) = &result.user else {
        return match &result.session {
            Some(session) => format!(
                "Session refers to unknown user '{}'. Run `catalog login` again.",
                session.username
            ),
            None => "Not logged in.".to_string(),
        };
    };
    let mut out = format!("{} ({})\n", user.display_name, user.username);
    out.push_str(&format!("Role: {}\n", user.role));
    if !user.active {
        out.push_str(&format!("{}\n", "Account is inactive".red()));
    }
    if let Some(session) = &result.session {
        out.push_str(&format!("Logged in at: {}\n", session.logged_in_at.to_rfc3339()));
    }
    if !result.grants.is_empty() {
        out.push_str("Grants:\n");
        for grant in &result.grants {
            out.push_str(&format!("  {}\n", format_grant(grant)));
        }
    }
    out
}
