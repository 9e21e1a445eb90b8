use super::{validate_domain, ContentStore, MetadataStore};
use crate::config::{self, StoreConfig};
use crate::error::{PageError, Result};
use crate::model::Page;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const DATA_DIR: &str = "data";
const PAGES_FILE: &str = "pages.json";
const CONTENT_DIR: &str = "pages";

pub struct FsBackend {
    root: PathBuf,
    content_ext: String,
    pretty: bool,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            content_ext: ".html".to_string(),
            pretty: true,
        }
    }

    /// Backend rooted at the process-wide root set by [`config::set_root`].
    pub fn from_global_root() -> Result<Self> {
        Ok(Self::new(config::root()?.to_path_buf()))
    }

    pub fn with_config(mut self, config: &StoreConfig) -> Self {
        self.content_ext = config.content_ext();
        self.pretty = config.pretty_metadata;
        self
    }

    pub fn with_content_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.content_ext = ext.to_string();
        } else {
            self.content_ext = format!(".{}", ext);
        }
        self
    }

    pub fn content_ext(&self) -> &str {
        &self.content_ext
    }

    fn domain_dir(&self, domain: &str) -> Result<PathBuf> {
        validate_domain(domain)?;
        Ok(self.root.join(domain))
    }

    /// Location of the metadata document for a domain.
    pub fn index_path(&self, domain: &str) -> Result<PathBuf> {
        Ok(self.domain_dir(domain)?.join(DATA_DIR).join(PAGES_FILE))
    }

    fn content_filename(&self, id: i64) -> String {
        format!("{}{}", id, self.content_ext)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(PageError::Io)?;
        }
        Ok(())
    }

    /// Write to a temp file in the same directory, then rename over the target.
    fn write_atomic(&self, target: &Path, contents: &[u8]) -> Result<()> {
        let dir = target
            .parent()
            .ok_or_else(|| PageError::Store(format!("No parent for {}", target.display())))?;
        self.ensure_dir(dir)?;

        let tmp = dir.join(format!(".write-{}.tmp", Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, target)) {
            let _ = fs::remove_file(&tmp);
            return Err(PageError::Io(e));
        }
        Ok(())
    }
}

impl MetadataStore for FsBackend {
    fn load_index(&self, domain: &str) -> Result<Option<Vec<Page>>> {
        let path = self.index_path(domain)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PageError::Io(e)),
        };

        let pages: Vec<Page> = serde_json::from_str(&content)
            .map_err(|source| PageError::CorruptMetadata { path, source })?;
        Ok(Some(pages))
    }

    fn save_index(&self, domain: &str, pages: &[Page]) -> Result<()> {
        let path = self.index_path(domain)?;
        let content = if self.pretty {
            serde_json::to_vec_pretty(pages)
        } else {
            serde_json::to_vec(pages)
        }
        .map_err(PageError::Serialization)?;

        self.write_atomic(&path, &content)?;
        debug!(domain = %domain, count = pages.len(), "wrote metadata document");
        Ok(())
    }
}

impl ContentStore for FsBackend {
    fn read_content(&self, domain: &str, id: i64) -> Result<Option<String>> {
        let path = self.content_path(domain, id)?;
        // Bodies are opaque; invalid UTF-8 is replaced rather than rejected
        match fs::read(path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PageError::Io(e)),
        }
    }

    fn write_content(&self, domain: &str, id: i64, content: &str) -> Result<()> {
        let path = self.content_path(domain, id)?;
        self.write_atomic(&path, content.as_bytes())
    }

    fn content_path(&self, domain: &str, id: i64) -> Result<PathBuf> {
        Ok(self
            .domain_dir(domain)?
            .join(CONTENT_DIR)
            .join(self.content_filename(id)))
    }
}
