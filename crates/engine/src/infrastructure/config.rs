//! Engine configuration from the environment.

use std::path::Path;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "cyoa.db";
/// Default `tracing_subscriber::EnvFilter` directive.
pub const DEFAULT_LOG_FILTER: &str = "cyoa_engine=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// SQLite database file (`CYOA_DB_PATH`)
    pub db_path: String,
    /// Log filter directive (`CYOA_LOG`, falling back to `RUST_LOG`)
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load `.env` files from the repo root, then read the process environment.
    pub fn from_env() -> Self {
        load_dotenv_from_repo_root();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read("CYOA_DB_PATH").unwrap_or(defaults.db_path),
            log_filter: read("CYOA_LOG")
                .or_else(|| read("RUST_LOG"))
                .unwrap_or(defaults.log_filter),
        }
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}
