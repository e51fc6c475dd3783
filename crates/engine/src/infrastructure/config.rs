//! Engine configuration from the environment.
//!
//! | Variable                   | Default                       |
//! |----------------------------|-------------------------------|
//! | `DATABASE_URL`             | `sqlite:catalog.db?mode=rwc`  |
//! | `DATABASE_MAX_CONNECTIONS` | `5`                           |
//! | `DATABASE_BUSY_TIMEOUT_MS` | `5000`                        |

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:catalog.db?mode=rwc";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// How long a writer waits on a locked database before the store gives up.
    pub busy_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup.
    ///
    /// Unset, blank, or unparsable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let database_url = value("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let max_connections = value("DATABASE_MAX_CONNECTIONS")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let busy_timeout_ms = value("DATABASE_BUSY_TIMEOUT_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);

        Self {
            database_url,
            max_connections,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        }
    }
}

/// Directories searched for env files: the working directory first, then the
/// workspace root.
pub fn dotenv_search_dirs(current_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    let mut dirs: Vec<PathBuf> = current_dir.into_iter().collect();
    if !dirs.iter().any(|dir| same_dir(dir, &workspace_root)) {
        dirs.push(workspace_root);
    }
    dirs
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Load env files from the working directory, then from the workspace root.
///
/// The first file to set a variable wins.
pub fn load_dotenv() {
    load_dotenv_from_dirs(&dotenv_search_dirs(std::env::current_dir().ok()));
}

fn load_dotenv_from_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        load_dotenv_from(dir);
    }
}

/// Load `.env.local` then `.env` from `dir`, if present.
///
/// Variables already set in the process environment win.
pub fn load_dotenv_from(dir: &Path) {
    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = dir.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load env file");
            }
        }
    }
}
