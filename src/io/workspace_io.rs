use std::fs;
use std::path::{Path, PathBuf};

use super::backend::JsonFileBackend;
use super::config_io::{self, CONFIG_FILE, ConfigError};
use super::store::{StoreError, TrackerStore};
use crate::model::config::HabitsConfig;

pub const HABITS_DIR: &str = "habits";

/// Error type for workspace discovery and loading
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a habits workspace: no habits/ directory found (run `hb init`)")]
    NotAWorkspace,
    #[error("habits workspace already exists at {0}")]
    AlreadyInitialized(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A loaded workspace: config plus an open store
pub struct Workspace {
    /// Path to the `habits/` directory
    pub habits_dir: PathBuf,
    pub config: HabitsConfig,
    pub store: TrackerStore<JsonFileBackend>,
}

/// Walk up from `start` looking for `habits/config.toml`.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        let habits_dir = current.join(HABITS_DIR);
        if habits_dir.is_dir() && habits_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotAWorkspace);
        }
    }
}

/// Load config and open the store of the workspace rooted at `root`.
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let habits_dir = root.join(HABITS_DIR);
    if !habits_dir.is_dir() {
        return Err(WorkspaceError::NotAWorkspace);
    }
    let (config, _) = config_io::read_config(&habits_dir)?;
    let backend = JsonFileBackend::new(habits_dir.join(&config.store.file));
    let store = TrackerStore::open(backend)?;
    tracing::debug!(root = %root.display(), "workspace loaded");
    Ok(Workspace {
        habits_dir,
        config,
        store,
    })
}

/// Create `habits/` under `root` with the given config text. An existing
/// workspace is only overwritten with `force`; its store is kept.
pub fn init_workspace(root: &Path, config_text: &str, force: bool) -> Result<PathBuf, WorkspaceError> {
    let habits_dir = root.join(HABITS_DIR);
    let config_path = habits_dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(WorkspaceError::AlreadyInitialized(habits_dir));
    }
    fs::create_dir_all(&habits_dir)?;
    fs::write(&config_path, config_text)?;
    tracing::info!(path = %habits_dir.display(), "workspace initialized");
    Ok(habits_dir)
}
