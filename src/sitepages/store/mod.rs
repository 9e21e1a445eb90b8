//! # Storage Layer
//!
//! Two independent stores sit under the repository:
//!
//! - [`MetadataStore`]: the whole collection of [`Page`] records for a domain,
//!   read and written as one JSON document.
//! - [`ContentStore`]: one body per page, addressed by domain and page id.
//!
//! Both are plain I/O. The in-memory cache and lookup rules live in
//! [`crate::repository`].
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production storage under a root directory.
//! - [`mem_backend::MemBackend`]: in-memory storage for tests and embedding.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! └── <domain>/
//!     ├── data/pages.json     # Metadata document (JSON array of pages)
//!     └── pages/<id>.html     # Page bodies, verbatim
//! ```
//!
//! Metadata and content are stored separately so listing pages never reads
//! a body.

use crate::error::{PageError, Result};
use crate::model::Page;
use std::path::PathBuf;
use tracing::info;

pub mod fs_backend;
pub mod mem_backend;

/// Persistence of a domain's full metadata collection.
pub trait MetadataStore {
    /// Read the metadata document.
    /// Returns Ok(None) if the domain has no document yet.
    /// A document that exists but does not parse is an error.
    fn load_index(&self, domain: &str) -> Result<Option<Vec<Page>>>;

    /// Overwrite the metadata document with `pages`, in order.
    fn save_index(&self, domain: &str, pages: &[Page]) -> Result<()>;

    /// Load the collection, bootstrapping a missing domain with a single
    /// zero-value placeholder page which is persisted right away.
    fn load_or_init(&self, domain: &str) -> Result<Vec<Page>> {
        if let Some(pages) = self.load_index(domain)? {
            return Ok(pages);
        }

        let pages = vec![Page::default()];
        self.save_index(domain, &pages)?;
        info!(domain = %domain, "initialized metadata for new domain");
        Ok(pages)
    }
}

/// Persistence of page bodies.
pub trait ContentStore {
    /// Read a page body.
    /// Returns Ok(None) if there is no body stored for the page.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_content(&self, domain: &str, id: i64) -> Result<Option<String>>;

    /// Overwrite a page body. Readers never observe a partial write.
    fn write_content(&self, domain: &str, id: i64, content: &str) -> Result<()>;

    /// Where the body lives. Virtual for non-filesystem backends.
    fn content_path(&self, domain: &str, id: i64) -> Result<PathBuf>;
}

/// A backend providing both stores.
pub trait StorageBackend: MetadataStore + ContentStore {}

impl<T: MetadataStore + ContentStore> StorageBackend for T {}

/// Reject domain names that would escape or collapse the per-domain directory.
pub fn validate_domain(domain: &str) -> Result<()> {
    let invalid = domain.is_empty()
        || domain == "."
        || domain == ".."
        || domain.contains('/')
        || domain.contains('\\')
        || domain.contains('\0');
    if invalid {
        return Err(PageError::InvalidDomain(domain.to_string()));
    }
    Ok(())
}
