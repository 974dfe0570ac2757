use catalog_admin::config::CatalogConfig;
use catalog_admin::tooling::cli::{CliContext, Commands};
use tempfile::TempDir;

/// A CLI context persisting into `dir`.
pub fn context_in(dir: &TempDir) -> CliContext {
    CliContext::from_config(CatalogConfig::default(), Some(dir.path().to_path_buf())).unwrap()
}

pub fn login(ctx: &CliContext, username: &str) {
    ctx.execute(&Commands::Login {
        username: username.to_string(),
    })
    .unwrap();
}

pub fn json(output: &str) -> serde_json::Value {
    serde_json::from_str(output).unwrap_or_else(|e| panic!("invalid JSON ({}): {}", e, output))
}
