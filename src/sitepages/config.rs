use crate::error::{PageError, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_CONTENT_EXT: &str = ".html";

static ROOT: OnceCell<PathBuf> = OnceCell::new();

/// Set the process-wide storage root. All domain directories live under it.
///
/// Can only be set once; repeating the same path is accepted.
pub fn set_root<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref().to_path_buf();
    let stored = ROOT.get_or_init(|| path.clone());
    if *stored != path {
        return Err(PageError::RootAlreadySet(stored.clone()));
    }
    Ok(())
}

/// The process-wide storage root, if [`set_root`] has been called.
pub fn root() -> Result<&'static Path> {
    ROOT.get().map(PathBuf::as_path).ok_or(PageError::RootNotSet)
}

/// Store settings, read from `config.json` in the configuration directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base directory holding one subdirectory per domain
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Extension of content files (e.g. ".html", ".md")
    #[serde(default = "default_content_ext")]
    pub content_ext: String,

    /// Write the metadata document indented
    #[serde(default = "default_pretty")]
    pub pretty_metadata: bool,
}

fn default_content_ext() -> String {
    DEFAULT_CONTENT_EXT.to_string()
}

fn default_pretty() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: None,
            content_ext: default_content_ext(),
            pretty_metadata: default_pretty(),
        }
    }
}

impl StoreConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PageError::Io)?;
        let config: StoreConfig =
            serde_json::from_str(&content).map_err(PageError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PageError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PageError::Serialization)?;
        fs::write(config_path, content).map_err(PageError::Io)?;
        Ok(())
    }

    /// Content file extension, always starting with a dot.
    pub fn content_ext(&self) -> String {
        if self.content_ext.starts_with('.') {
            self.content_ext.clone()
        } else {
            format!(".{}", self.content_ext)
        }
    }

    pub fn set_content_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.content_ext = ext.to_string();
        } else {
            self.content_ext = format!(".{}", ext);
        }
    }
}
