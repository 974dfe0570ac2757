//! User command service: session handling and user administration.
//!
//! Administration refuses to lock the catalog out: the acting user cannot
//! remove or deactivate themselves, and the last active admin cannot be
//! demoted, deactivated or removed.

use super::directory::UserDirectory;
use super::identity::User;
use super::session::Session;
use crate::catalog::Catalog;
use crate::error::ApiError;
use crate::permission::{has_permission, require_permission, Action, Grant, Resource, Role};
use crate::types::Language;

pub struct UserCommandService;

/// Result of whoami command.
#[derive(Debug, Clone)]
pub struct WhoAmIResult {
    pub session: Option<Session>,
    pub user: Option<User>,
    pub grants: Vec<Grant>,
}

/// Result of can command.
#[derive(Debug, Clone)]
pub struct PermissionCheckResult {
    pub username: Option<String>,
    pub action: Action,
    pub resource: Resource,
    pub language: Option<Language>,
    pub allowed: bool,
}

impl UserCommandService {
    pub fn login(catalog: &mut Catalog, username: &str) -> Result<Session, ApiError> {
        let session = catalog.users().authenticate(username)?;
        catalog.replace_session(Some(session.clone()))?;
        tracing::info!(username = %session.username, "logged in");
        Ok(session)
    }

    /// Clear the session. Returns the session that was active, if any.
    pub fn logout(catalog: &mut Catalog) -> Result<Option<Session>, ApiError> {
        let previous = catalog.session().cloned();
        catalog.replace_session(None)?;
        if let Some(session) = &previous {
            tracing::info!(username = %session.username, "logged out");
        }
        Ok(previous)
    }

    pub fn whoami(catalog: &Catalog) -> WhoAmIResult {
        let user = catalog.current_user().cloned();
        let grants = user
            .as_ref()
            .filter(|u| u.active)
            .map(User::grants)
            .unwrap_or_default();
        WhoAmIResult {
            session: catalog.session().cloned(),
            user,
            grants,
        }
    }

    /// Evaluate the permission predicate for the current user.
    pub fn can(
        catalog: &Catalog,
        action: Action,
        resource: Resource,
        language: Option<Language>,
    ) -> PermissionCheckResult {
        let user = catalog.current_user();
        PermissionCheckResult {
            username: user.map(|u| u.username.clone()),
            action,
            resource,
            language,
            allowed: has_permission(user, action, resource, language),
        }
    }

    pub fn list(catalog: &Catalog) -> Result<Vec<User>, ApiError> {
        require_permission(catalog.current_user(), Action::Read, Resource::Users, None)?;
        Ok(catalog.users().users().to_vec())
    }

    pub fn add(
        catalog: &mut Catalog,
        username: &str,
        role: Role,
        display_name: Option<&str>,
    ) -> Result<User, ApiError> {
        require_permission(catalog.current_user(), Action::Create, Resource::Users, None)?;
        let username = username.trim();
        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(username);
        let user = User::new(username, display_name, role);

        let mut users = catalog.users().clone();
        users.add(user.clone())?;
        catalog.replace_users(users)?;
        tracing::info!(username = %user.username, role = %user.role, "user added");
        Ok(user)
    }

    pub fn set_role(catalog: &mut Catalog, username: &str, role: Role) -> Result<User, ApiError> {
        require_permission(catalog.current_user(), Action::Update, Resource::Users, None)?;
        let mut users = catalog.users().clone();
        let target = users.find_by_username_or_error(username)?.clone();
        if role != Role::Admin {
            Self::ensure_not_last_admin(&users, &target, "demote")?;
        }
        let updated = users.set_role(username, role)?.clone();
        catalog.replace_users(users)?;
        tracing::info!(username = %updated.username, role = %updated.role, "user role changed");
        Ok(updated)
    }

    pub fn set_active(
        catalog: &mut Catalog,
        username: &str,
        active: bool,
    ) -> Result<User, ApiError> {
        require_permission(catalog.current_user(), Action::Update, Resource::Users, None)?;
        let mut users = catalog.users().clone();
        let target = users.find_by_username_or_error(username)?.clone();
        if !active {
            Self::ensure_not_self(catalog, &target, "deactivate")?;
            Self::ensure_not_last_admin(&users, &target, "deactivate")?;
        }
        let updated = users.set_active(username, active)?.clone();
        catalog.replace_users(users)?;
        tracing::info!(username = %updated.username, active, "user activation changed");
        Ok(updated)
    }

    pub fn remove(catalog: &mut Catalog, username: &str) -> Result<User, ApiError> {
        require_permission(catalog.current_user(), Action::Delete, Resource::Users, None)?;
        let mut users = catalog.users().clone();
        let target = users.find_by_username_or_error(username)?.clone();
        Self::ensure_not_self(catalog, &target, "remove")?;
        Self::ensure_not_last_admin(&users, &target, "remove")?;
        let removed = users.remove(username)?;
        catalog.replace_users(users)?;
        tracing::info!(username = %removed.username, "user removed");
        Ok(removed)
    }

    fn ensure_not_self(catalog: &Catalog, target: &User, verb: &str) -> Result<(), ApiError> {
        match catalog.current_user() {
            Some(current) if current.id == target.id => Err(ApiError::Protected(format!(
                "You cannot {} your own account",
                verb
            ))),
            _ => Ok(()),
        }
    }

    fn ensure_not_last_admin(
        users: &UserDirectory,
        target: &User,
        verb: &str,
    ) -> Result<(), ApiError> {
        if target.role == Role::Admin && target.active && users.active_admins() <= 1 {
            return Err(ApiError::Protected(format!(
                "Cannot {} {}: it is the last active admin",
                verb, target.username
            )));
        }
        Ok(())
    }
}
