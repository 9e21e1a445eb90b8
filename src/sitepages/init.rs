use crate::config::{self, StoreConfig};
use crate::error::{PageError, Result};
use crate::repository::PageRepository;
use crate::store::fs_backend::FsBackend;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the storage root.
pub const ROOT_ENV: &str = "SITEPAGES_ROOT";

pub struct PageContext {
    pub repo: PageRepository<FsBackend>,
    pub config: StoreConfig,
    pub root: PathBuf,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "sitepages", "sitepages")
        .ok_or_else(|| PageError::Store("Could not determine platform directories".to_string()))
}

/// Platform config directory, where `config.json` is looked up by default.
pub fn default_config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Pick the storage root: explicit argument, then the environment value,
/// then the config file, then the platform data directory.
pub fn resolve_root(
    explicit: Option<&Path>,
    env_value: Option<String>,
    config: &StoreConfig,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.as_os_str().is_empty() {
            return Ok(path.to_path_buf());
        }
    }
    if let Some(value) = env_value {
        if !value.is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    if let Some(path) = &config.root {
        if !path.as_os_str().is_empty() {
            return Ok(path.clone());
        }
    }
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Load config, fix the process-wide root and build a filesystem-backed repository.
///
/// Without `config_dir` the platform config directory is used.
pub fn initialize(explicit_root: Option<&Path>, config_dir: Option<&Path>) -> Result<PageContext> {
    let config_dir = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_config_dir()?,
    };
    let config = StoreConfig::load(&config_dir).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config, using defaults");
        StoreConfig::default()
    });

    let root = resolve_root(explicit_root, std::env::var(ROOT_ENV).ok(), &config)?;
    config::set_root(&root)?;
    debug!(root = %root.display(), "storage root set");

    let backend = FsBackend::from_global_root()?.with_config(&config);
    Ok(PageContext {
        repo: PageRepository::with_backend(backend),
        config,
        root,
    })
}
