//! User directory: the list of known users and username authentication.

use super::identity::User;
use super::session::Session;
use crate::error::ApiError;
use crate::permission::Role;
use crate::types::Language;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Ordered collection of users, unique by username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Usernames compare case-insensitively.
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        let wanted = username.trim();
        self.users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(wanted))
    }

    pub fn find_by_username_or_error(&self, username: &str) -> Result<&User, ApiError> {
        self.find_by_username(username)
            .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", username)))
    }

    pub fn add(&mut self, user: User) -> Result<(), ApiError> {
        if user.username.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }
        if self.find_by_username(&user.username).is_some() {
            return Err(ApiError::Conflict(format!(
                "Username already taken: {}",
                user.username
            )));
        }
        self.users.push(user);
        Ok(())
    }

    pub fn set_role(&mut self, username: &str, role: Role) -> Result<&User, ApiError> {
        let user = self.find_mut(username)?;
        user.role = role;
        Ok(user)
    }

    pub fn set_active(&mut self, username: &str, active: bool) -> Result<&User, ApiError> {
        let user = self.find_mut(username)?;
        user.active = active;
        Ok(user)
    }

    pub fn remove(&mut self, username: &str) -> Result<User, ApiError> {
        let index = self
            .users
            .iter()
            .position(|u| u.username.eq_ignore_ascii_case(username.trim()))
            .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", username)))?;
        Ok(self.users.remove(index))
    }

    /// Number of active administrators.
    pub fn active_admins(&self) -> usize {
        self.users
            .iter()
            .filter(|u| u.active && u.role == Role::Admin)
            .count()
    }

    /// Authenticate by username alone. Unknown and inactive users are rejected.
    pub fn authenticate(&self, username: &str) -> Result<Session, ApiError> {
        let user = self
            .find_by_username(username)
            .ok_or_else(|| ApiError::Unauthorized(format!("Unknown user: {}", username)))?;
        if !user.active {
            return Err(ApiError::Unauthorized(format!(
                "User {} is inactive",
                user.username
            )));
        }
        Ok(Session {
            user_id: user.id.clone(),
            username: user.username.clone(),
            logged_in_at: Utc::now(),
        })
    }

    /// Resolve a persisted session to its user. Sessions pointing at a removed
    /// user resolve to nothing.
    pub fn session_user(&self, session: Option<&Session>) -> Option<&User> {
        session.and_then(|s| self.get(&s.user_id))
    }

    fn find_mut(&mut self, username: &str) -> Result<&mut User, ApiError> {
        let wanted = username.trim();
        self.users
            .iter_mut()
            .find(|u| u.username.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", username)))
    }
}

pub fn default_users() -> UserDirectory {
    UserDirectory::new(vec![
        User::new("admin", "Administrator", Role::Admin).with_id("user-admin"),
        User::new("editor", "Content Editor", Role::Editor).with_id("user-editor"),
        User::new("viewer", "Viewer", Role::Viewer).with_id("user-viewer"),
        User::new("translator", "Chinese Translator", Role::Translator(Language::Zh))
            .with_id("user-translator"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_users_cover_every_role() {
        let users = default_users();
        assert_eq!(users.len(), 4);
        assert_eq!(users.active_admins(), 1);
        assert_eq!(
            users.find_by_username("TRANSLATOR").unwrap().role,
            Role::Translator(Language::Zh)
        );
    }

    #[test]
    fn test_authenticate() {
        let mut users = default_users();
        let session = users.authenticate("editor").unwrap();
        assert_eq!(session.user_id, "user-editor");
        assert_eq!(
            users.session_user(Some(&session)).unwrap().username,
            "editor"
        );

        users.set_active("editor", false).unwrap();
        assert!(matches!(
            users.authenticate("editor"),
            Err(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            users.authenticate("nobody"),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut users = default_users();
        let err = users.add(User::new("Admin", "Second admin", Role::Admin));
        assert!(matches!(err, Err(ApiError::Conflict(_))));
        let err = users.add(User::new("  ", "Blank", Role::Viewer));
        assert!(matches!(err, Err(ApiError::ValidationError(_))));
        users.add(User::new("li", "Li Wei", Role::Translator(Language::Zh))).unwrap();
        assert_eq!(users.len(), 5);
    }

    #[test]
    fn test_removed_user_session_resolves_to_none() {
        let mut users = default_users();
        let session = users.authenticate("viewer").unwrap();
        users.remove("viewer").unwrap();
        assert!(users.session_user(Some(&session)).is_none());
        assert!(users.remove("viewer").is_err());
    }
}
