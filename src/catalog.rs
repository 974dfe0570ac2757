//! Catalog state
//!
//! Holds the category tree, products, users and the auth session as loaded
//! from a [`StateStore`]. Each collection is written back whole whenever it
//! changes. Missing or unreadable blobs fall back to the built-in defaults.

use crate::category::{default_categories, CategoryTree};
use crate::error::{ApiError, StorageError};
use crate::product::{default_products, Product};
use crate::storage::{StateKey, StateStore};
use crate::user::{default_users, Session, User, UserDirectory};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

pub struct Catalog {
    store: Arc<dyn StateStore>,
    categories: CategoryTree,
    products: Vec<Product>,
    users: UserDirectory,
    session: Option<Session>,
}

impl Catalog {
    /// Load every collection from `store`.
    pub fn open(store: Arc<dyn StateStore>) -> Self {
        let categories: CategoryTree =
            load_or_default(store.as_ref(), StateKey::Categories, default_categories);
        let duplicates = categories.duplicate_ids();
        if !duplicates.is_empty() {
            tracing::warn!(?duplicates, "persisted category tree has duplicate ids");
        }
        let products = load_or_default(store.as_ref(), StateKey::Products, default_products);
        let users = load_or_default(store.as_ref(), StateKey::Users, default_users);
        let session: Option<Session> = load_or_default(store.as_ref(), StateKey::Auth, || None);

        tracing::info!(
            location = %store.location(),
            categories = categories.len(),
            products = products.len(),
            users = users.len(),
            "catalog loaded"
        );

        Self {
            store,
            categories,
            products,
            users,
            session,
        }
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn categories(&self) -> &CategoryTree {
        &self.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The logged-in user, if the session still points at a known user.
    pub fn current_user(&self) -> Option<&User> {
        self.users.session_user(self.session.as_ref())
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn product_or_error(&self, product_id: &str) -> Result<&Product, ApiError> {
        self.product(product_id)
            .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", product_id)))
    }

    /// Replace the category tree and persist it.
    pub fn replace_categories(&mut self, tree: CategoryTree) -> Result<(), ApiError> {
        persist(self.store.as_ref(), StateKey::Categories, &tree)?;
        self.categories = tree;
        Ok(())
    }

    /// Replace the product list and persist it.
    pub fn replace_products(&mut self, products: Vec<Product>) -> Result<(), ApiError> {
        persist(self.store.as_ref(), StateKey::Products, &products)?;
        self.products = products;
        Ok(())
    }

    /// Replace the category tree and product list together. Both blobs are
    /// serialized before anything is written, and memory is only updated once
    /// both saves succeed. A failed product write restores the previous tree.
    pub fn replace_categories_and_products(
        &mut self,
        tree: CategoryTree,
        products: Vec<Product>,
    ) -> Result<(), ApiError> {
        let tree_blob = encode(&tree)?;
        let products_blob = encode(&products)?;
        let previous_tree = encode(&self.categories)?;

        self.store.save(StateKey::Categories, &tree_blob)?;
        if let Err(e) = self.store.save(StateKey::Products, &products_blob) {
            if let Err(restore) = self.store.save(StateKey::Categories, &previous_tree) {
                tracing::warn!(error = %restore, "failed to restore category tree after product write failure");
            }
            return Err(e.into());
        }
        tracing::info!("categories and products persisted");

        self.categories = tree;
        self.products = products;
        Ok(())
    }

    pub fn replace_users(&mut self, users: UserDirectory) -> Result<(), ApiError> {
        persist(self.store.as_ref(), StateKey::Users, &users)?;
        self.users = users;
        Ok(())
    }

    pub fn replace_session(&mut self, session: Option<Session>) -> Result<(), ApiError> {
        persist(self.store.as_ref(), StateKey::Auth, &session)?;
        self.session = session;
        Ok(())
    }

    /// Wipe every persisted key and reload the built-in defaults.
    pub fn reset(&mut self) -> Result<(), ApiError> {
        for key in StateKey::ALL {
            self.store.clear(key)?;
        }
        self.categories = default_categories();
        self.products = default_products();
        self.users = default_users();
        self.session = None;
        tracing::info!(location = %self.store.location(), "catalog reset to defaults");
        Ok(())
    }
}

fn load_or_default<T, F>(store: &dyn StateStore, key: StateKey, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let blob = match store.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return default(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "failed to read persisted state, using defaults");
            return default();
        }
    };
    match serde_json::from_str(&blob) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "malformed persisted state, using defaults");
            default()
        }
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value).map_err(StorageError::from)?)
}

fn persist<T: Serialize + ?Sized>(
    store: &dyn StateStore,
    key: StateKey,
    value: &T,
) -> Result<(), ApiError> {
    let blob = encode(value)?;
    store.save(key, &blob)?;
    tracing::info!(key = %key, "state persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, Parent};
    use crate::storage::MemoryStateStore;

    #[test]
    fn test_open_empty_store_uses_defaults() {
        let catalog = Catalog::open(Arc::new(MemoryStateStore::new()));
        assert_eq!(catalog.categories(), &default_categories());
        assert_eq!(catalog.products().len(), default_products().len());
        assert_eq!(catalog.users().len(), 4);
        assert!(catalog.session().is_none());
        assert!(catalog.current_user().is_none());
    }

    #[test]
    fn test_malformed_blob_falls_back_to_defaults() {
        let store = Arc::new(MemoryStateStore::new());
        store.save(StateKey::Categories, "{ not json").unwrap();
        store.save(StateKey::Users, "42").unwrap();
        let catalog = Catalog::open(store);
        assert_eq!(catalog.categories(), &default_categories());
        assert_eq!(catalog.users(), &default_users());
    }

    #[test]
    fn test_changes_survive_reopen() {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStateStore::new());
        let mut catalog = Catalog::open(Arc::clone(&store));
        let edit = catalog
            .categories()
            .insert(&Parent::Root, Category::new("garden", "Garden"));
        catalog.replace_categories(edit.tree).unwrap();
        let session = catalog.users().authenticate("admin").unwrap();
        catalog.replace_session(Some(session)).unwrap();

        let reopened = Catalog::open(store);
        assert!(reopened.categories().contains("garden"));
        assert_eq!(reopened.current_user().unwrap().username, "admin");
    }

    /// Memory store whose product writes always fail.
    struct ProductWriteFails(MemoryStateStore);

    impl StateStore for ProductWriteFails {
        fn load(&self, key: StateKey) -> Result<Option<String>, StorageError> {
            self.0.load(key)
        }

        fn save(&self, key: StateKey, blob: &str) -> Result<(), StorageError> {
            if key == StateKey::Products {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.0.save(key, blob)
        }

        fn clear(&self, key: StateKey) -> Result<(), StorageError> {
            self.0.clear(key)
        }

        fn location(&self) -> String {
            self.0.location()
        }
    }

    #[test]
    fn test_failed_product_write_leaves_state_untouched() {
        let store: Arc<dyn StateStore> = Arc::new(ProductWriteFails(MemoryStateStore::new()));
        let mut catalog = Catalog::open(Arc::clone(&store));
        let before_tree = catalog.categories().clone();
        let before_products = catalog.products().to_vec();

        let edit = catalog.categories().delete("kitchen");
        let err = catalog.replace_categories_and_products(edit.tree, Vec::new());
        assert!(matches!(err, Err(ApiError::StorageError(_))));

        assert_eq!(catalog.categories(), &before_tree);
        assert_eq!(catalog.products(), before_products.as_slice());
        let reopened = Catalog::open(store);
        assert!(reopened.categories().contains("kitchen"));
        assert_eq!(reopened.products().len(), before_products.len());
    }

    #[test]
    fn test_reset_clears_store() {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStateStore::new());
        let mut catalog = Catalog::open(Arc::clone(&store));
        catalog.replace_products(Vec::new()).unwrap();
        catalog.reset().unwrap();
        assert_eq!(catalog.products().len(), default_products().len());
        for key in StateKey::ALL {
            assert!(store.load(key).unwrap().is_none());
        }
    }
}
