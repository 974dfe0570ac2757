//! Role-based permissions
//!
//! A static table maps each role to a list of grants. A request is allowed when
//! any grant of the requesting user's role matches it; there are no deny rules.

use crate::error::ApiError;
use crate::types::Language;
use crate::user::User;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    /// Wildcard action: a grant with `Admin` matches every action
    Admin,
}

impl Action {
    /// The concrete actions, without the wildcard.
    pub const CRUD: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Admin => "admin",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "admin" => Ok(Action::Admin),
            other => Err(ApiError::ValidationError(format!(
                "Invalid action: {}. Must be create, read, update, delete or admin",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Products,
    Categories,
    Users,
    Settings,
    /// Wildcard resource: a grant on `All` matches every resource
    All,
}

impl Resource {
    /// The concrete resources, without the wildcard.
    pub const CONCRETE: [Resource; 4] = [
        Resource::Products,
        Resource::Categories,
        Resource::Users,
        Resource::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Categories => "categories",
            Resource::Users => "users",
            Resource::Settings => "settings",
            Resource::All => "all",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "products" => Ok(Resource::Products),
            "categories" => Ok(Resource::Categories),
            "users" => Ok(Resource::Users),
            "settings" => Ok(Resource::Settings),
            "all" => Ok(Resource::All),
            other => Err(ApiError::ValidationError(format!(
                "Invalid resource: {}. Must be products, categories, users, settings or all",
                other
            ))),
        }
    }
}

/// One permission entry: `(action, resource, optional language)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub action: Action,
    pub resource: Resource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl Grant {
    pub const fn new(action: Action, resource: Resource) -> Self {
        Self {
            action,
            resource,
            language: None,
        }
    }

    pub const fn in_language(action: Action, resource: Resource, language: Language) -> Self {
        Self {
            action,
            resource,
            language: Some(language),
        }
    }

    pub fn is_superuser(&self) -> bool {
        self.action == Action::Admin && self.resource == Resource::All
    }

    pub fn matches(&self, action: Action, resource: Resource, language: Option<Language>) -> bool {
        if self.is_superuser() {
            return true;
        }
        let action_ok = self.action == action || self.action == Action::Admin;
        let resource_ok = self.resource == resource || self.resource == Resource::All;
        let language_ok = match self.language {
            None => true,
            Some(restricted) => language == Some(restricted),
        };
        action_ok && resource_ok && language_ok
    }
}

/// User role. `Translator` is sandboxed to a single content language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
    Translator(Language),
}

impl Role {
    /// The static grant table.
    pub fn grants(self) -> Vec<Grant> {
        use Action::*;
        use Resource::*;
        match self {
            Role::Admin => vec![Grant::new(Admin, All)],
            Role::Editor => vec![
                Grant::new(Create, Products),
                Grant::new(Read, Products),
                Grant::new(Update, Products),
                Grant::new(Delete, Products),
                Grant::new(Create, Categories),
                Grant::new(Read, Categories),
                Grant::new(Update, Categories),
                Grant::new(Delete, Categories),
                Grant::new(Read, Settings),
            ],
            Role::Viewer => vec![Grant::new(Read, Products), Grant::new(Read, Categories)],
            Role::Translator(language) => vec![
                Grant::in_language(Read, Products, language),
                Grant::in_language(Update, Products, language),
                Grant::in_language(Read, Categories, language),
            ],
        }
    }

    /// Language the role is restricted to, if any.
    pub fn language(self) -> Option<Language> {
        match self {
            Role::Translator(language) => Some(language),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Editor => f.write_str("editor"),
            Role::Viewer => f.write_str("viewer"),
            Role::Translator(language) => write!(f, "translator:{}", language),
        }
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => match other.split_once(':') {
                Some(("translator", language)) => Ok(Role::Translator(language.parse()?)),
                _ => Err(ApiError::ValidationError(format!(
                    "Invalid role: {}. Must be admin, editor, viewer or translator:<ru|en|zh>",
                    s.trim()
                ))),
            },
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

/// May `user` perform `action` on `resource`, optionally scoped to `language`?
///
/// Absent and inactive users have no permissions.
pub fn has_permission(
    user: Option<&User>,
    action: Action,
    resource: Resource,
    language: Option<Language>,
) -> bool {
    let Some(user) = user else {
        return false;
    };
    if !user.active {
        return false;
    }
    user.role
        .grants()
        .iter()
        .any(|grant| grant.matches(action, resource, language))
}

/// Like [`has_permission`], but reports a denial as [`ApiError::Unauthorized`].
pub fn require_permission(
    user: Option<&User>,
    action: Action,
    resource: Resource,
    language: Option<Language>,
) -> Result<(), ApiError> {
    if has_permission(user, action, resource, language) {
        return Ok(());
    }
    let who = match user {
        Some(u) if !u.active => format!("User {} is inactive", u.username),
        Some(u) => format!("User {} (role: {})", u.username, u.role),
        None => "Not logged in".to_string(),
    };
    let scope = language
        .map(|l| format!(" in language {}", l))
        .unwrap_or_default();
    tracing::debug!(%action, %resource, ?language, "permission denied");
    Err(ApiError::Unauthorized(format!(
        "{}: cannot {} {}{}",
        who, action, resource, scope
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User::new("tester", "Tester", role)
    }

    fn expected(role: Role, action: Action, resource: Resource) -> bool {
        use Action::*;
        use Resource::*;
        match role {
            Role::Admin => true,
            Role::Editor => matches!(
                (action, resource),
                (_, Products) | (_, Categories) | (Read, Settings)
            ),
            Role::Viewer => matches!((action, resource), (Read, Products) | (Read, Categories)),
            Role::Translator(_) => matches!(
                (action, resource),
                (Read, Products) | (Update, Products) | (Read, Categories)
            ),
        }
    }

    #[test]
    fn test_permission_matrix_in_own_language() {
        let roles = [
            Role::Admin,
            Role::Editor,
            Role::Viewer,
            Role::Translator(Language::Zh),
        ];
        for role in roles {
            let user = user(role);
            for action in Action::CRUD {
                for resource in Resource::CONCRETE {
                    assert_eq!(
                        has_permission(Some(&user), action, resource, Some(Language::Zh)),
                        expected(role, action, resource),
                        "role={} action={} resource={}",
                        role,
                        action,
                        resource
                    );
                }
            }
        }
    }

    #[test]
    fn test_translator_denied_in_other_languages() {
        let translator = user(Role::Translator(Language::Zh));
        for language in [Some(Language::Ru), Some(Language::En), None] {
            for action in Action::CRUD {
                for resource in Resource::CONCRETE {
                    assert!(
                        !has_permission(Some(&translator), action, resource, language),
                        "translator:zh must not {} {} in {:?}",
                        action,
                        resource,
                        language
                    );
                }
            }
        }
        assert!(has_permission(
            Some(&translator),
            Action::Update,
            Resource::Products,
            Some(Language::Zh)
        ));
    }

    #[test]
    fn test_unrestricted_roles_ignore_language() {
        for role in [Role::Admin, Role::Editor, Role::Viewer] {
            let user = user(role);
            for language in [None, Some(Language::Ru), Some(Language::En)] {
                assert!(has_permission(
                    Some(&user),
                    Action::Read,
                    Resource::Products,
                    language
                ));
            }
        }
    }

    #[test]
    fn test_absent_or_inactive_user_has_nothing() {
        assert!(!has_permission(None, Action::Read, Resource::Products, None));
        let mut admin = user(Role::Admin);
        admin.active = false;
        assert!(!has_permission(Some(&admin), Action::Read, Resource::Products, None));
        let err = require_permission(Some(&admin), Action::Read, Resource::Products, None);
        assert!(matches!(err, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_admin_action_grant_matches_every_action() {
        let grant = Grant::new(Action::Admin, Resource::Products);
        for action in Action::CRUD {
            assert!(grant.matches(action, Resource::Products, None));
            assert!(!grant.matches(action, Resource::Users, None));
        }
        let grant = Grant::new(Action::Read, Resource::All);
        assert!(grant.matches(Action::Read, Resource::Users, None));
        assert!(!grant.matches(Action::Delete, Resource::Users, None));
    }

    #[test]
    fn test_role_round_trip_through_string() {
        for raw in ["admin", "editor", "viewer", "translator:ru"] {
            let role: Role = raw.parse().unwrap();
            assert_eq!(role.to_string(), raw);
        }
        assert!("translator".parse::<Role>().is_err());
        assert!("translator:de".parse::<Role>().is_err());
        assert!("owner".parse::<Role>().is_err());

        let json = serde_json::to_string(&Role::Translator(Language::Zh)).unwrap();
        assert_eq!(json, "\"translator:zh\"");
        let role: Role = serde_json::from_str("\"Editor\"").unwrap();
        assert_eq!(role, Role::Editor);
    }
}
