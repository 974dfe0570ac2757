use catalog_admin::storage::{FileStateStore, StateKey, StateStore};
use catalog_admin::tooling::cli::{CategoryCommands, Commands};
use std::fs;
use tempfile::TempDir;

use super::support::{context_in, json, login};

#[test]
fn changes_survive_a_new_process() {
    let temp_dir = TempDir::new().unwrap();
    {
        let ctx = context_in(&temp_dir);
        login(&ctx, "editor");
        ctx.execute(&Commands::Category {
            command: CategoryCommands::Add {
                name: "Garden".to_string(),
                parent: Some("home".to_string()),
                icon: Some("flower".to_string()),
                id: Some("garden".to_string()),
            },
        })
        .unwrap();
    }

    let store = FileStateStore::new(temp_dir.path());
    assert!(store.path_for(StateKey::Categories).is_file());
    assert!(store.path_for(StateKey::Auth).is_file());

    let ctx = context_in(&temp_dir);
    let output = ctx
        .execute(&Commands::Category {
            command: CategoryCommands::Show {
                target: "Home/Garden".to_string(),
                format: "json".to_string(),
            },
        })
        .unwrap();
    let parsed = json(&output);
    assert_eq!(parsed["category"]["id"], "garden");
    assert_eq!(parsed["category"]["icon"], "flower");
    assert_eq!(parsed["ancestor_ids"][0], "home");
}

#[test]
fn malformed_blobs_fall_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("categories.json"), "[{ broken").unwrap();
    fs::write(temp_dir.path().join("catalog_users.json"), "{\"not\": \"a list\"}").unwrap();

    let ctx = context_in(&temp_dir);
    login(&ctx, "admin");
    let status = json(
        &ctx.execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert_eq!(status["categories"].as_u64(), Some(15));
    assert_eq!(status["users"].as_u64(), Some(4));
}

#[test]
fn reset_removes_persisted_files() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    login(&ctx, "admin");
    ctx.execute(&Commands::Category {
        command: CategoryCommands::Delete {
            id: "clothing".to_string(),
            force: true,
        },
    })
    .unwrap();

    ctx.execute(&Commands::Reset { force: true }).unwrap();

    let store = FileStateStore::new(temp_dir.path());
    for key in StateKey::ALL {
        assert!(store.load(key).unwrap().is_none(), "{} should be cleared", key);
    }
    let reopened = context_in(&temp_dir);
    login(&reopened, "viewer");
    let listed = json(
        &reopened
            .execute(&Commands::Category {
                command: CategoryCommands::List {
                    query: Some("clothing".to_string()),
                    format: "json".to_string(),
                },
            })
            .unwrap(),
    );
    assert_eq!(listed["total"].as_u64(), Some(1));
}
