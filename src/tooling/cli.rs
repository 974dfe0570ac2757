//! CLI Tooling
//!
//! Command-line interface for catalog administration. Every command runs
//! against the catalog persisted in the data directory, as the user of the
//! current login session.

use crate::catalog::Catalog;
use crate::category::commands::{
    CategoryDeleteResult, CategoryListResult, CategoryRelocateResult, CategoryShowResult,
};
use crate::category::{Category, CategoryCommandService, CategoryPath};
use crate::config::{CatalogConfig, ConfigLoader};
use crate::error::ApiError;
use crate::permission::{require_permission, Action, Resource, Role};
use crate::product::commands::{ProductEditResult, ProductImageResult};
use crate::product::{ImageRef, Product, ProductCommandService, ProductDraft, ProductPatch, ProductQuery};
use crate::storage::{FileStateStore, StateStore};
use crate::tooling::format::{
    format_breadcrumb_text, format_category_list_text, format_category_show_text,
    format_gallery_text, format_product_list_text, format_product_show_text, format_status_text,
    format_user_list_text, format_whoami_text, CatalogStatus,
};
use crate::types::{Language, LocalizedText};
use crate::user::commands::{PermissionCheckResult, WhoAmIResult};
use crate::user::{User, UserCommandService};
use clap::{Args, Parser, Subcommand};
use parking_lot::RwLock;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Catalog CLI - multi-language product catalog administration
#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Administer a multi-language product catalog: categories, products and users")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the persisted catalog (default: $XDG_DATA_HOME/catalog-admin)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Content language (ru, en, zh); defaults to the configured language
    #[arg(long)]
    pub lang: Option<Language>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in as an existing user
    Login { username: String },
    /// End the current session
    Logout,
    /// Show the logged-in user and their grants
    Whoami {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show data location, session and collection sizes
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check whether the current user may perform an action
    Can {
        /// create, read, update, delete or admin
        action: Action,
        /// products, categories, users, settings or all
        resource: Resource,
        /// Scope the check to a content language
        #[arg(long)]
        language: Option<Language>,
    },
    /// Manage the category tree
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage products
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Wipe all persisted data and restore the built-in defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Print the category tree
    List {
        /// Keep only categories whose name (or a descendant's) contains this text
        #[arg(long)]
        query: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one category by id or name path (e.g. Electronics/Audio)
    Show {
        target: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add a category
    Add {
        name: String,
        /// Parent category id (default: top level)
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        /// Explicit id (default: generated)
        #[arg(long)]
        id: Option<String>,
    },
    /// Rename a category
    Rename {
        id: String,
        name: String,
        #[arg(long)]
        icon: Option<String>,
        /// Rewrite product category paths that pointed at the old name
        #[arg(long)]
        relink: bool,
    },
    /// Move a category (with its subtree) under another parent
    Move {
        id: String,
        /// New parent id (default: top level)
        #[arg(long)]
        parent: Option<String>,
        /// Rewrite product category paths that pointed at the old location
        #[arg(long)]
        relink: bool,
    },
    /// Delete a category and its subtree
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Print the breadcrumb from the root to a category
    Path {
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Translated texts shared by product add and edit.
#[derive(Args, Debug, Clone, Default)]
pub struct TextArgs {
    #[arg(long)]
    pub name_ru: Option<String>,
    #[arg(long)]
    pub name_en: Option<String>,
    #[arg(long)]
    pub name_zh: Option<String>,
    #[arg(long)]
    pub description_ru: Option<String>,
    #[arg(long)]
    pub description_en: Option<String>,
    #[arg(long)]
    pub description_zh: Option<String>,
}

impl TextArgs {
    fn names(&self) -> BTreeMap<Language, String> {
        collect_texts([
            (Language::Ru, &self.name_ru),
            (Language::En, &self.name_en),
            (Language::Zh, &self.name_zh),
        ])
    }

    fn descriptions(&self) -> BTreeMap<Language, String> {
        collect_texts([
            (Language::Ru, &self.description_ru),
            (Language::En, &self.description_en),
            (Language::Zh, &self.description_zh),
        ])
    }
}

fn collect_texts(entries: [(Language, &Option<String>); 3]) -> BTreeMap<Language, String> {
    entries
        .into_iter()
        .filter_map(|(language, text)| text.as_ref().map(|t| (language, t.clone())))
        .collect()
}

fn localized(texts: &BTreeMap<Language, String>) -> LocalizedText {
    let mut out = LocalizedText::default();
    for (language, text) in texts {
        out.set(*language, text.clone());
    }
    out
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List products
    List {
        /// Category path, e.g. Electronics/Audio
        #[arg(long)]
        category: Option<String>,
        /// Also list products filed below --category
        #[arg(long)]
        descendants: bool,
        /// Text to search in names and descriptions
        #[arg(long)]
        query: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one product
    Show {
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add a product
    Add {
        /// Explicit id (default: generated)
        #[arg(long)]
        id: Option<String>,
        #[command(flatten)]
        texts: TextArgs,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "0")]
        quantity: u32,
        /// Primary category path
        #[arg(long)]
        category: String,
        /// Additional category path (repeatable)
        #[arg(long = "also")]
        also: Vec<String>,
        /// Image URL or local file (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Edit product fields; only the given fields change
    Edit {
        id: String,
        #[command(flatten)]
        texts: TextArgs,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        quantity: Option<u32>,
        /// Primary category path
        #[arg(long)]
        category: Option<String>,
        /// Replace additional category paths (repeatable)
        #[arg(long = "also")]
        also: Vec<String>,
        /// Remove all additional categories
        #[arg(long, conflicts_with = "also")]
        clear_also: bool,
    },
    /// Delete a product
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Manage a product's image gallery
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },
}

#[derive(Subcommand)]
pub enum ImageCommands {
    /// Append an image (http(s) URL or local image file)
    Add { id: String, source: String },
    /// Remove the image at an index
    Remove { id: String, index: usize },
    /// Make the image at an index the current one
    Select { id: String, index: usize },
    /// Advance to the next image, wrapping around
    Next { id: String },
    /// Go back to the previous image, wrapping around
    Prev { id: String },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add a user
    Add {
        username: String,
        /// admin, editor, viewer or translator:<ru|en|zh>
        role: Role,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Change a user's role
    SetRole { username: String, role: Role },
    /// Allow a user to log in again
    Activate { username: String },
    /// Block a user from logging in
    Deactivate { username: String },
    /// Remove a user
    Remove {
        username: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// CLI context holding the loaded catalog
pub struct CliContext {
    catalog: RwLock<Catalog>,
    config: CatalogConfig,
    language: Language,
}

impl CliContext {
    /// Load configuration from `config_path`, or from the standard sources.
    pub fn load_config(config_path: Option<&Path>) -> Result<CatalogConfig, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(config)
    }

    /// Create a new CLI context
    pub fn new(data_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = Self::load_config(config_path.as_deref())?;
        Self::from_config(config, data_dir)
    }

    /// Create a context from an already loaded configuration.
    pub fn from_config(config: CatalogConfig, data_dir: Option<PathBuf>) -> Result<Self, ApiError> {
        let data_dir = config.storage.resolve_data_dir(data_dir)?;
        let store: Arc<dyn StateStore> = Arc::new(FileStateStore::new(data_dir));
        Ok(Self::from_store(store, config))
    }

    /// Create a context over any state store.
    pub fn from_store(store: Arc<dyn StateStore>, config: CatalogConfig) -> Self {
        let language = config.default_language;
        Self {
            catalog: RwLock::new(Catalog::open(store)),
            config,
            language,
        }
    }

    /// Override the content language for this invocation.
    pub fn with_language(mut self, language: Option<Language>) -> Self {
        if let Some(language) = language {
            self.language = language;
        }
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        tracing::debug!(command = command_name(command), language = %self.language, "executing command");
        match command {
            Commands::Login { username } => self.handle_login(username),
            Commands::Logout => self.handle_logout(),
            Commands::Whoami { format } => self.handle_whoami(format),
            Commands::Status { format } => self.handle_status(format),
            Commands::Can {
                action,
                resource,
                language,
            } => self.handle_can(*action, *resource, *language),
            Commands::Category { command } => self.handle_category_command(command),
            Commands::Product { command } => self.handle_product_command(command),
            Commands::User { command } => self.handle_user_command(command),
            Commands::Reset { force } => self.handle_reset(*force),
        }
    }

    fn handle_login(&self, username: &str) -> Result<String, ApiError> {
        let mut catalog = self.catalog.write();
        let session = UserCommandService::login(&mut catalog, username)?;
        let role = catalog
            .current_user()
            .map(|u| u.role.to_string())
            .unwrap_or_default();
        Ok(format!("Logged in as {} ({})", session.username, role))
    }

    fn handle_logout(&self) -> Result<String, ApiError> {
        let mut catalog = self.catalog.write();
        match UserCommandService::logout(&mut catalog)? {
            Some(session) => Ok(format!("Logged out {}", session.username)),
            None => Ok("Not logged in".to_string()),
        }
    }

    fn handle_whoami(&self, format: &str) -> Result<String, ApiError> {
        let catalog = self.catalog.read();
        let result = UserCommandService::whoami(&catalog);
        match format {
            "json" => Ok(format_whoami_json(&result)),
            _ => Ok(format_whoami_text(&result)),
        }
    }

    fn handle_status(&self, format: &str) -> Result<String, ApiError> {
        let catalog = self.catalog.read();
        let user = catalog.current_user();
        let status = CatalogStatus {
            location: catalog.location(),
            language: self.language,
            username: user.map(|u| u.username.clone()),
            role: user.map(|u| u.role.to_string()),
            categories: catalog.categories().len(),
            products: catalog.products().len(),
            users: catalog.users().len(),
        };
        match format {
            "json" => Ok(to_pretty(&json!({
                "data_dir": status.location,
                "language": status.language,
                "logged_in": status.username.is_some(),
                "username": status.username,
                "role": status.role,
                "categories": status.categories,
                "products": status.products,
                "users": status.users,
            }))),
            _ => Ok(format_status_text(&status)),
        }
    }

    fn handle_can(
        &self,
        action: Action,
        resource: Resource,
        language: Option<Language>,
    ) -> Result<String, ApiError> {
        let catalog = self.catalog.read();
        let result = UserCommandService::can(&catalog, action, resource, language);
        Ok(format_permission_check(&result))
    }

    fn handle_reset(&self, force: bool) -> Result<String, ApiError> {
        {
            let catalog = self.catalog.read();
            require_permission(catalog.current_user(), Action::Admin, Resource::Settings, None)?;
        }
        if !confirm(force, "Erase all catalog data and restore the defaults?")? {
            return Ok("Reset cancelled".to_string());
        }
        let mut catalog = self.catalog.write();
        catalog.reset()?;
        Ok(format!(
            "Catalog reset to defaults at {}. You have been logged out.",
            catalog.location()
        ))
    }

    fn handle_category_command(&self, command: &CategoryCommands) -> Result<String, ApiError> {
        let language = self.language;
        match command {
            CategoryCommands::List { query, format } => {
                let catalog = self.catalog.read();
                let result = CategoryCommandService::list(&catalog, query.as_deref(), language)?;
                match format.as_str() {
                    "json" => Ok(format_category_list_json(&result)),
                    _ => Ok(format_category_list_text(&result)),
                }
            }
            CategoryCommands::Show { target, format } => {
                let catalog = self.catalog.read();
                let result = CategoryCommandService::show(&catalog, target, language)?;
                match format.as_str() {
                    "json" => Ok(format_category_show_json(&result)),
                    _ => Ok(format_category_show_text(&result)),
                }
            }
            CategoryCommands::Add {
                name,
                parent,
                icon,
                id,
            } => {
                let mut catalog = self.catalog.write();
                let result = CategoryCommandService::add(
                    &mut catalog,
                    name,
                    parent.as_deref(),
                    icon.as_deref(),
                    id.as_deref(),
                    language,
                )?;
                Ok(format!("Added category {} ({})", result.path, result.id))
            }
            CategoryCommands::Rename {
                id,
                name,
                icon,
                relink,
            } => {
                let mut catalog = self.catalog.write();
                let result = CategoryCommandService::rename(
                    &mut catalog,
                    id,
                    name,
                    icon.as_deref(),
                    *relink,
                    language,
                )?;
                Ok(format_relocate_result("Renamed", &result))
            }
            CategoryCommands::Move { id, parent, relink } => {
                let mut catalog = self.catalog.write();
                let result = CategoryCommandService::move_to(
                    &mut catalog,
                    id,
                    parent.as_deref(),
                    *relink,
                    language,
                )?;
                Ok(format_relocate_result("Moved", &result))
            }
            CategoryCommands::Delete { id, force } => self.handle_category_delete(id, *force),
            CategoryCommands::Path { id, format } => {
                let catalog = self.catalog.read();
                let trail = CategoryCommandService::breadcrumb(&catalog, id, language)?;
                match format.as_str() {
                    "json" => Ok(format_breadcrumb_json(&trail)),
                    _ => Ok(format_breadcrumb_text(&trail)),
                }
            }
        }
    }

    fn handle_category_delete(&self, id: &str, force: bool) -> Result<String, ApiError> {
        {
            let catalog = self.catalog.read();
            require_permission(
                catalog.current_user(),
                Action::Delete,
                Resource::Categories,
                Some(self.language),
            )?;
            let path = catalog
                .categories()
                .path_of(id)
                .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", id)))?;
            let prompt = format!("Delete category '{}' and everything below it?", path);
            if !confirm(force, &prompt)? {
                return Ok("Deletion cancelled".to_string());
            }
        }
        let mut catalog = self.catalog.write();
        let result = CategoryCommandService::delete(&mut catalog, id, self.language)?;
        Ok(format_category_delete_result(&result))
    }

    fn handle_product_command(&self, command: &ProductCommands) -> Result<String, ApiError> {
        let language = self.language;
        match command {
            ProductCommands::List {
                category,
                descendants,
                query,
                format,
            } => {
                let catalog = self.catalog.read();
                let query = ProductQuery {
                    category: category.as_deref().map(CategoryPath::parse),
                    include_descendants: *descendants,
                    text: query.clone(),
                };
                let result = ProductCommandService::list(&catalog, &query, language)?;
                match format.as_str() {
                    "json" => Ok(format_product_list_json(&result.products)),
                    _ => Ok(format_product_list_text(&result.products, language)),
                }
            }
            ProductCommands::Show { id, format } => {
                let catalog = self.catalog.read();
                let product = ProductCommandService::show(&catalog, id, language)?;
                match format.as_str() {
                    "json" => Ok(to_pretty(&product)),
                    _ => Ok(format_product_show_text(&product, language)),
                }
            }
            ProductCommands::Add {
                id,
                texts,
                price,
                quantity,
                category,
                also,
                images,
            } => {
                let images = images
                    .iter()
                    .map(|source| ImageRef::ingest(source))
                    .collect::<Result<Vec<_>, _>>()?;
                let draft = ProductDraft {
                    id: id.clone(),
                    name: localized(&texts.names()),
                    description: localized(&texts.descriptions()),
                    price: *price,
                    quantity: *quantity,
                    category: CategoryPath::parse(category),
                    additional_categories: also.iter().map(|p| CategoryPath::parse(p)).collect(),
                    images,
                };
                let mut catalog = self.catalog.write();
                let product = ProductCommandService::add(&mut catalog, draft)?;
                Ok(format!(
                    "Added product {} ({}) in {}",
                    product.name.display(language),
                    product.id,
                    product.category
                ))
            }
            ProductCommands::Edit {
                id,
                texts,
                price,
                quantity,
                category,
                also,
                clear_also,
            } => {
                let additional_categories = if *clear_also {
                    Some(Vec::new())
                } else if also.is_empty() {
                    None
                } else {
                    Some(also.iter().map(|p| CategoryPath::parse(p)).collect())
                };
                let patch = ProductPatch {
                    names: texts.names(),
                    descriptions: texts.descriptions(),
                    price: *price,
                    quantity: *quantity,
                    category: category.as_deref().map(CategoryPath::parse),
                    additional_categories,
                };
                let mut catalog = self.catalog.write();
                let result = ProductCommandService::edit(&mut catalog, id, &patch)?;
                Ok(format_product_edit_result(&result, language))
            }
            ProductCommands::Delete { id, force } => self.handle_product_delete(id, *force),
            ProductCommands::Image { command } => self.handle_image_command(command),
        }
    }

    fn handle_product_delete(&self, id: &str, force: bool) -> Result<String, ApiError> {
        {
            let catalog = self.catalog.read();
            require_permission(catalog.current_user(), Action::Delete, Resource::Products, None)?;
            let product = catalog.product_or_error(id)?;
            let prompt = format!(
                "Delete product '{}' ({})?",
                product.name.display(self.language),
                product.id
            );
            if !confirm(force, &prompt)? {
                return Ok("Deletion cancelled".to_string());
            }
        }
        let mut catalog = self.catalog.write();
        let removed = ProductCommandService::delete(&mut catalog, id)?;
        Ok(format!("Deleted product: {}", removed.id))
    }

    fn handle_image_command(&self, command: &ImageCommands) -> Result<String, ApiError> {
        let mut catalog = self.catalog.write();
        let result = match command {
            ImageCommands::Add { id, source } => {
                ProductCommandService::add_image(&mut catalog, id, source)?
            }
            ImageCommands::Remove { id, index } => {
                ProductCommandService::remove_image(&mut catalog, id, *index)?
            }
            ImageCommands::Select { id, index } => {
                ProductCommandService::select_image(&mut catalog, id, *index)?
            }
            ImageCommands::Next { id } => ProductCommandService::step_image(&mut catalog, id, true)?,
            ImageCommands::Prev { id } => {
                ProductCommandService::step_image(&mut catalog, id, false)?
            }
        };
        Ok(format_image_result(&result))
    }

    fn handle_user_command(&self, command: &UserCommands) -> Result<String, ApiError> {
        match command {
            UserCommands::List { format } => {
                let catalog = self.catalog.read();
                let users = UserCommandService::list(&catalog)?;
                match format.as_str() {
                    "json" => Ok(format_user_list_json(&users)),
                    _ => Ok(format_user_list_text(&users)),
                }
            }
            UserCommands::Add {
                username,
                role,
                display_name,
            } => {
                let mut catalog = self.catalog.write();
                let user =
                    UserCommandService::add(&mut catalog, username, *role, display_name.as_deref())?;
                Ok(format!("Added user {} ({})", user.username, user.role))
            }
            UserCommands::SetRole { username, role } => {
                let mut catalog = self.catalog.write();
                let user = UserCommandService::set_role(&mut catalog, username, *role)?;
                Ok(format!("User {} is now {}", user.username, user.role))
            }
            UserCommands::Activate { username } => {
                let mut catalog = self.catalog.write();
                let user = UserCommandService::set_active(&mut catalog, username, true)?;
                Ok(format!("Activated user {}", user.username))
            }
            UserCommands::Deactivate { username } => {
                let mut catalog = self.catalog.write();
                let user = UserCommandService::set_active(&mut catalog, username, false)?;
                Ok(format!("Deactivated user {}", user.username))
            }
            UserCommands::Remove { username, force } => self.handle_user_remove(username, *force),
        }
    }

    fn handle_user_remove(&self, username: &str, force: bool) -> Result<String, ApiError> {
        {
            let catalog = self.catalog.read();
            require_permission(catalog.current_user(), Action::Delete, Resource::Users, None)?;
            catalog.users().find_by_username_or_error(username)?;
        }
        if !confirm(force, &format!("Remove user '{}'?", username))? {
            return Ok("Removal cancelled".to_string());
        }
        let mut catalog = self.catalog.write();
        let removed = UserCommandService::remove(&mut catalog, username)?;
        Ok(format!("Removed user: {}", removed.username))
    }
}

/// Ask for confirmation unless `force` is set.
fn confirm(force: bool, prompt: &str) -> Result<bool, ApiError> {
    if force {
        return Ok(true);
    }
    use dialoguer::Confirm;
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))
}

/// Stable dotted name of a command, used in logs.
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Login { .. } => "login",
        Commands::Logout => "logout",
        Commands::Whoami { .. } => "whoami",
        Commands::Status { .. } => "status",
        Commands::Can { .. } => "can",
        Commands::Reset { .. } => "reset",
        Commands::Category { command } => match command {
            CategoryCommands::List { .. } => "category.list",
            CategoryCommands::Show { .. } => "category.show",
            CategoryCommands::Add { .. } => "category.add",
            CategoryCommands::Rename { .. } => "category.rename",
            CategoryCommands::Move { .. } => "category.move",
            CategoryCommands::Delete { .. } => "category.delete",
            CategoryCommands::Path { .. } => "category.path",
        },
        Commands::Product { command } => match command {
            ProductCommands::List { .. } => "product.list",
            ProductCommands::Show { .. } => "product.show",
            ProductCommands::Add { .. } => "product.add",
            ProductCommands::Edit { .. } => "product.edit",
            ProductCommands::Delete { .. } => "product.delete",
            ProductCommands::Image { command } => match command {
                ImageCommands::Add { .. } => "product.image.add",
                ImageCommands::Remove { .. } => "product.image.remove",
                ImageCommands::Select { .. } => "product.image.select",
                ImageCommands::Next { .. } => "product.image.next",
                ImageCommands::Prev { .. } => "product.image.prev",
            },
        },
        Commands::User { command } => match command {
            UserCommands::List { .. } => "user.list",
            UserCommands::Add { .. } => "user.add",
            UserCommands::SetRole { .. } => "user.set_role",
            UserCommands::Activate { .. } => "user.activate",
            UserCommands::Deactivate { .. } => "user.deactivate",
            UserCommands::Remove { .. } => "user.remove",
        },
    }
}

fn to_pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn format_permission_check(result: &PermissionCheckResult) -> String {
    let who = result.username.as_deref().unwrap_or("anonymous");
    let scope = result
        .language
        .map(|l| format!(" in {}", l))
        .unwrap_or_default();
    let verdict = if result.allowed { "allowed" } else { "denied" };
    format!(
        "{}: {} {} {}{}",
        verdict, who, result.action, result.resource, scope
    )
}

fn format_whoami_json(result: &WhoAmIResult) -> String {
    let out = match &result.user {
        Some(user) => json!({
            "logged_in": true,
            "user": user,
            "logged_in_at": result.session.as_ref().map(|s| s.logged_in_at),
            "grants": result.grants,
        }),
        None => json!({ "logged_in": false }),
    };
    to_pretty(&out)
}

fn format_category_list_json(result: &CategoryListResult) -> String {
    to_pretty(&json!({
        "categories": result.tree,
        "query": result.query,
        "total": result.total,
    }))
}

fn format_category_show_json(result: &CategoryShowResult) -> String {
    to_pretty(&json!({
        "category": result.category,
        "path": result.path,
        "ancestor_ids": result.ancestor_ids,
        "direct_products": result.direct_products,
        "subtree_products": result.subtree_products,
    }))
}

fn format_breadcrumb_json(trail: &[Category]) -> String {
    let items: Vec<_> = trail
        .iter()
        .map(|c| json!({ "id": c.id, "name": c.name, "icon": c.icon }))
        .collect();
    let path = CategoryPath::from_segments(trail.iter().map(|c| c.name.as_str()));
    to_pretty(&json!({ "breadcrumb": items, "path": path }))
}

fn format_relocate_result(verb: &str, result: &CategoryRelocateResult) -> String {
    let mut out = format!(
        "{} category {}: {} -> {}",
        verb, result.id, result.old_path, result.new_path
    );
    if result.relinked_products > 0 {
        out.push_str(&format!(
            "\nRelinked {} product(s) to the new path",
            result.relinked_products
        ));
    }
    if result.stale_products > 0 {
        out.push_str(&format!(
            "\n{} product(s) still reference {} (rerun with --relink to update them)",
            result.stale_products, result.old_path
        ));
    }
    out
}

fn format_category_delete_result(result: &CategoryDeleteResult) -> String {
    let mut out = format!(
        "Deleted category {} ({}) and {} node(s) in total",
        result.path, result.id, result.removed_nodes
    );
    if result.reassigned_products > 0 {
        out.push_str(&format!(
            "\nMoved {} product(s) to Uncategorized",
            result.reassigned_products
        ));
    }
    out
}

fn format_product_list_json(products: &[Product]) -> String {
    to_pretty(&json!({ "products": products, "total": products.len() }))
}

fn format_product_edit_result(result: &ProductEditResult, language: Language) -> String {
    let mut changed: Vec<String> = result
        .languages
        .iter()
        .map(|l| format!("{} texts", l))
        .collect();
    if result.non_text_changed {
        changed.push("details".to_string());
    }
    format!(
        "Updated product {} ({}): {}",
        result.product.name.display(language),
        result.product.id,
        changed.join(", ")
    )
}

fn format_image_result(result: &ProductImageResult) -> String {
    let mut out = String::new();
    if let Some(image) = &result.affected {
        out.push_str(&format!("Image: {}\n", image.display_source()));
    }
    out.push_str(&format_gallery_text(result));
    out
}

fn format_user_list_json(users: &[User]) -> String {
    to_pretty(&json!({ "users": users, "total": users.len() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStateStore;
    use clap::CommandFactory;

    fn context() -> CliContext {
        CliContext::from_store(Arc::new(MemoryStateStore::new()), CatalogConfig::default())
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_and_nested_args() {
        let cli = Cli::try_parse_from([
            "catalog", "--lang", "zh", "product", "edit", "prod-kettle", "--name-zh", "水壶",
        ])
        .unwrap();
        assert_eq!(cli.lang, Some(Language::Zh));
        assert_eq!(command_name(&cli.command), "product.edit");

        let cli = Cli::try_parse_from(["catalog", "user", "add", "li", "translator:zh"]).unwrap();
        match cli.command {
            Commands::User {
                command: UserCommands::Add { role, .. },
            } => assert_eq!(role, Role::Translator(Language::Zh)),
            _ => panic!("expected user add"),
        }

        assert!(Cli::try_parse_from(["catalog", "user", "add", "li", "owner"]).is_err());
        assert!(Cli::try_parse_from(["catalog", "can", "fly", "products"]).is_err());
    }

    #[test]
    fn test_language_override() {
        let ctx = context().with_language(Some(Language::Ru));
        assert_eq!(ctx.language(), Language::Ru);
        let ctx = context().with_language(None);
        assert_eq!(ctx.language(), Language::En);
    }

    #[test]
    fn test_commands_require_login() {
        let ctx = context();
        let err = ctx.execute(&Commands::Category {
            command: CategoryCommands::List {
                query: None,
                format: "text".to_string(),
            },
        });
        assert!(matches!(err, Err(ApiError::Unauthorized(_))));

        ctx.execute(&Commands::Login {
            username: "viewer".to_string(),
        })
        .unwrap();
        let output = ctx
            .execute(&Commands::Category {
                command: CategoryCommands::Path {
                    id: "headphones".to_string(),
                    format: "text".to_string(),
                },
            })
            .unwrap();
        assert_eq!(output, "Electronics > Audio > Headphones");
    }

    #[test]
    fn test_can_output() {
        let ctx = context();
        ctx.execute(&Commands::Login {
            username: "translator".to_string(),
        })
        .unwrap();
        let output = ctx
            .execute(&Commands::Can {
                action: Action::Update,
                resource: Resource::Products,
                language: Some(Language::Zh),
            })
            .unwrap();
        assert_eq!(output, "allowed: translator update products in zh");
    }

    #[test]
    fn test_forced_reset_needs_admin() {
        let ctx = context();
        ctx.execute(&Commands::Login {
            username: "editor".to_string(),
        })
        .unwrap();
        let err = ctx.execute(&Commands::Reset { force: true });
        assert!(matches!(err, Err(ApiError::Unauthorized(_))));

        ctx.execute(&Commands::Login {
            username: "admin".to_string(),
        })
        .unwrap();
        ctx.execute(&Commands::Reset { force: true }).unwrap();
        let status = ctx
            .execute(&Commands::Status {
                format: "json".to_string(),
            })
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&status).unwrap();
        assert_eq!(parsed["logged_in"], json!(false));
    }
}
