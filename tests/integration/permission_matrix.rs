use catalog_admin::user::User;
use catalog_admin::{has_permission, Action, Language, Resource, Role};

const ROWS: &[(&str, [&str; 4])] = &[
    // role,            products, categories, users, settings
    ("admin", ["crud", "crud", "crud", "crud"]),
    ("editor", ["crud", "crud", "", "r"]),
    ("viewer", ["r", "r", "", ""]),
    ("translator:zh", ["ru", "r", "", ""]),
];

fn letter(action: Action) -> char {
    match action {
        Action::Create => 'c',
        Action::Read => 'r',
        Action::Update => 'u',
        Action::Delete => 'd',
        Action::Admin => 'a',
    }
}

#[test]
fn role_grid_matches_table_in_granted_language() {
    for (role, cells) in ROWS {
        let role: Role = role.parse().unwrap();
        let user = User::new("matrix", "Matrix", role);
        for (resource, allowed) in Resource::CONCRETE.iter().zip(cells.iter()) {
            for action in Action::CRUD {
                let expected = allowed.contains(letter(action));
                assert_eq!(
                    has_permission(Some(&user), action, *resource, Some(Language::Zh)),
                    expected,
                    "{} {} {}",
                    role,
                    action,
                    resource
                );
            }
        }
    }
}

#[test]
fn translator_grid_is_empty_outside_its_language() {
    let user = User::new("t", "T", Role::Translator(Language::Zh));
    for language in [None, Some(Language::Ru), Some(Language::En)] {
        for resource in Resource::CONCRETE {
            for action in Action::CRUD {
                assert!(!has_permission(Some(&user), action, resource, language));
            }
        }
    }
}

#[test]
fn only_admin_passes_wildcard_requests() {
    for role in ["admin", "editor", "viewer", "translator:en"] {
        let role: Role = role.parse().unwrap();
        let user = User::new("w", "W", role);
        let expected = role == Role::Admin;
        assert_eq!(
            has_permission(Some(&user), Action::Admin, Resource::All, None),
            expected
        );
        assert_eq!(
            has_permission(Some(&user), Action::Delete, Resource::All, None),
            expected
        );
    }
}

#[test]
fn inactive_admin_has_nothing() {
    let mut user = User::new("root", "Root", Role::Admin);
    user.active = false;
    for resource in Resource::CONCRETE {
        assert!(!has_permission(Some(&user), Action::Read, resource, None));
    }
}
