use catalog_admin::tooling::cli::{
    CategoryCommands, Commands, ImageCommands, ProductCommands, TextArgs, UserCommands,
};
use catalog_admin::{ApiError, Language, Role};
use tempfile::TempDir;

use super::support::{context_in, json, login};

fn category_list(query: Option<&str>) -> Commands {
    Commands::Category {
        command: CategoryCommands::List {
            query: query.map(str::to_string),
            format: "json".to_string(),
        },
    }
}

#[test]
fn status_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    let output = ctx
        .execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed = json(&output);
    assert_eq!(parsed["logged_in"], false);
    assert_eq!(parsed["language"], "en");
    assert_eq!(parsed["categories"].as_u64(), Some(15));
    assert_eq!(parsed["products"].as_u64(), Some(3));
    assert_eq!(parsed["users"].as_u64(), Some(4));
    assert!(parsed["data_dir"].as_str().is_some());
}

#[test]
fn category_list_json_filters_by_query() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    login(&ctx, "viewer");

    let parsed = json(&ctx.execute(&category_list(Some("head"))).unwrap());
    assert_eq!(parsed["total"].as_u64(), Some(3));
    let roots = parsed["categories"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["name"], "Electronics");
    assert_eq!(roots[0]["children"][0]["name"], "Audio");
    assert_eq!(roots[0]["children"][0]["children"][0]["id"], "headphones");
}

#[test]
fn whoami_json_lists_grants() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    login(&ctx, "translator");
    let parsed = json(
        &ctx.execute(&Commands::Whoami {
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert_eq!(parsed["logged_in"], true);
    assert_eq!(parsed["user"]["role"], "translator:zh");
    let grants = parsed["grants"].as_array().unwrap();
    assert_eq!(grants.len(), 3);
    assert!(grants.iter().all(|g| g["language"] == "zh"));
}

#[test]
fn viewer_cannot_change_anything() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    login(&ctx, "viewer");

    let err = ctx.execute(&Commands::Category {
        command: CategoryCommands::Add {
            name: "Toys".to_string(),
            parent: None,
            icon: None,
            id: None,
        },
    });
    assert!(matches!(err, Err(ApiError::Unauthorized(_))));

    let err = ctx.execute(&Commands::Product {
        command: ProductCommands::Delete {
            id: "prod-kettle".to_string(),
            force: true,
        },
    });
    assert!(matches!(err, Err(ApiError::Unauthorized(_))));

    let err = ctx.execute(&Commands::User {
        command: UserCommands::List {
            format: "text".to_string(),
        },
    });
    assert!(matches!(err, Err(ApiError::Unauthorized(_))));
}

#[test]
fn translator_edits_texts_in_own_language_only() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir).with_language(Some(Language::Zh));
    login(&ctx, "translator");

    let edit_zh = Commands::Product {
        command: ProductCommands::Edit {
            id: "prod-kettle".to_string(),
            texts: TextArgs {
                name_zh: Some("不锈钢电水壶".to_string()),
                ..Default::default()
            },
            price: None,
            quantity: None,
            category: None,
            also: Vec::new(),
            clear_also: false,
        },
    };
    let output = ctx.execute(&edit_zh).unwrap();
    assert!(output.contains("zh texts"), "{}", output);

    let edit_price = Commands::Product {
        command: ProductCommands::Edit {
            id: "prod-kettle".to_string(),
            texts: TextArgs::default(),
            price: Some(1.0),
            quantity: None,
            category: None,
            also: Vec::new(),
            clear_also: false,
        },
    };
    assert!(matches!(ctx.execute(&edit_price), Err(ApiError::Unauthorized(_))));

    let show = ctx
        .execute(&Commands::Product {
            command: ProductCommands::Show {
                id: "prod-kettle".to_string(),
                format: "json".to_string(),
            },
        })
        .unwrap();
    let parsed = json(&show);
    assert_eq!(parsed["name"]["zh"], "不锈钢电水壶");
    assert_eq!(parsed["price"].as_f64(), Some(34.5));

    // Reading in a foreign content language is denied as well
    let en_ctx = context_in(&temp_dir).with_language(Some(Language::En));
    let err = en_ctx.execute(&Commands::Product {
        command: ProductCommands::List {
            category: None,
            descendants: false,
            query: None,
            format: "json".to_string(),
        },
    });
    assert!(matches!(err, Err(ApiError::Unauthorized(_))));
}

#[test]
fn editor_manages_products_and_gallery() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    login(&ctx, "editor");

    ctx.execute(&Commands::Product {
        command: ProductCommands::Add {
            id: Some("prod-chair".to_string()),
            texts: TextArgs {
                name_en: Some("Oak Chair".to_string()),
                name_ru: Some("Дубовый стул".to_string()),
                ..Default::default()
            },
            price: 80.0,
            quantity: 6,
            category: "Home/Furniture".to_string(),
            also: Vec::new(),
            images: vec!["https://images.example.com/chair.jpg".to_string()],
        },
    })
    .unwrap();

    let output = ctx
        .execute(&Commands::Product {
            command: ProductCommands::Image {
                command: ImageCommands::Add {
                    id: "prod-chair".to_string(),
                    source: "https://images.example.com/chair-back.jpg".to_string(),
                },
            },
        })
        .unwrap();
    assert!(output.contains("2 image(s)"), "{}", output);

    ctx.execute(&Commands::Product {
        command: ProductCommands::Image {
            command: ImageCommands::Select {
                id: "prod-chair".to_string(),
                index: 1,
            },
        },
    })
    .unwrap();

    let listed = json(
        &ctx.execute(&Commands::Product {
            command: ProductCommands::List {
                category: Some("Home".to_string()),
                descendants: true,
                query: Some("oak".to_string()),
                format: "json".to_string(),
            },
        })
        .unwrap(),
    );
    assert_eq!(listed["total"].as_u64(), Some(1));
    let chair = &listed["products"][0];
    assert_eq!(chair["current_image"].as_u64(), Some(1));
    assert_eq!(chair["images"][1]["kind"], "url");

    let err = ctx.execute(&Commands::Product {
        command: ProductCommands::Add {
            id: None,
            texts: TextArgs::default(),
            price: 1.0,
            quantity: 0,
            category: "Home".to_string(),
            also: Vec::new(),
            images: Vec::new(),
        },
    });
    match err {
        Err(ApiError::ValidationError(message)) => {
            assert!(message.contains("Fill required fields"), "{}", message)
        }
        other => panic!("expected validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn deleting_a_category_moves_products_to_uncategorized() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    login(&ctx, "editor");

    let output = ctx
        .execute(&Commands::Category {
            command: CategoryCommands::Delete {
                id: "kitchen".to_string(),
                force: true,
            },
        })
        .unwrap();
    assert!(output.contains("Moved 1 product(s) to Uncategorized"), "{}", output);

    let kettle = json(
        &ctx.execute(&Commands::Product {
            command: ProductCommands::Show {
                id: "prod-kettle".to_string(),
                format: "json".to_string(),
            },
        })
        .unwrap(),
    );
    assert_eq!(kettle["category"], "Uncategorized");

    let err = ctx.execute(&Commands::Category {
        command: CategoryCommands::Delete {
            id: "uncategorized".to_string(),
            force: true,
        },
    });
    assert!(matches!(err, Err(ApiError::Protected(_))));
}

#[test]
fn admin_manages_users() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    login(&ctx, "admin");

    ctx.execute(&Commands::User {
        command: UserCommands::Add {
            username: "olga".to_string(),
            role: Role::Translator(Language::Ru),
            display_name: Some("Olga".to_string()),
        },
    })
    .unwrap();
    let users = json(
        &ctx.execute(&Commands::User {
            command: UserCommands::List {
                format: "json".to_string(),
            },
        })
        .unwrap(),
    );
    assert_eq!(users["total"].as_u64(), Some(5));

    ctx.execute(&Commands::User {
        command: UserCommands::Deactivate {
            username: "olga".to_string(),
        },
    })
    .unwrap();
    let err = ctx.execute(&Commands::Login {
        username: "olga".to_string(),
    });
    assert!(matches!(err, Err(ApiError::Unauthorized(_))));

    let err = ctx.execute(&Commands::User {
        command: UserCommands::Remove {
            username: "admin".to_string(),
            force: true,
        },
    });
    assert!(matches!(err, Err(ApiError::Protected(_))));
}

#[test]
fn reset_is_reserved_for_admins() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_in(&temp_dir);
    login(&ctx, "editor");
    let err = ctx.execute(&Commands::Reset { force: true });
    assert!(matches!(err, Err(ApiError::Unauthorized(_))));

    login(&ctx, "admin");
    let output = ctx.execute(&Commands::Reset { force: true }).unwrap();
    assert!(output.contains("reset to defaults"), "{}", output);
}
