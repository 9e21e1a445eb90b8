use super::{validate_domain, ContentStore, MetadataStore};
use crate::error::{PageError, Result};
use crate::model::Page;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory storage backend.
///
/// Locked with `parking_lot::RwLock` so a repository over it can be shared
/// across threads the same way as one over the filesystem.
#[derive(Default)]
pub struct MemBackend {
    index: RwLock<HashMap<String, Vec<Page>>>,
    content: RwLock<HashMap<(String, i64), String>>,
    simulate_write_error: AtomicBool,
    simulate_read_error: AtomicBool,
    index_loads: AtomicUsize,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Make content reads fail, as an unreadable body file would.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.store(simulate, Ordering::SeqCst);
    }

    /// Number of times `load_index` has been called.
    pub fn index_loads(&self) -> usize {
        self.index_loads.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(PageError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl MetadataStore for MemBackend {
    fn load_index(&self, domain: &str) -> Result<Option<Vec<Page>>> {
        validate_domain(domain)?;
        self.index_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.index.read().get(domain).cloned())
    }

    fn save_index(&self, domain: &str, pages: &[Page]) -> Result<()> {
        validate_domain(domain)?;
        self.check_write()?;
        // Mirror the document format: bodies never reach the metadata store
        let stored = pages
            .iter()
            .map(|p| Page {
                content: String::new(),
                ..p.clone()
            })
            .collect();
        self.index.write().insert(domain.to_string(), stored);
        Ok(())
    }
}

impl ContentStore for MemBackend {
    fn read_content(&self, domain: &str, id: i64) -> Result<Option<String>> {
        validate_domain(domain)?;
        if self.simulate_read_error.load(Ordering::SeqCst) {
            return Err(PageError::Store("Simulated read error".to_string()));
        }
        Ok(self.content.read().get(&(domain.to_string(), id)).cloned())
    }

    fn write_content(&self, domain: &str, id: i64, content: &str) -> Result<()> {
        validate_domain(domain)?;
        self.check_write()?;
        self.content
            .write()
            .insert((domain.to_string(), id), content.to_string());
        Ok(())
    }

    fn content_path(&self, domain: &str, id: i64) -> Result<PathBuf> {
        validate_domain(domain)?;
        Ok(PathBuf::from(format!("memory://{}/pages/{}", domain, id)))
    }
}
