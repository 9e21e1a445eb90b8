//! # Page Repository
//!
//! [`PageRepository`] keeps one in-memory collection of [`Page`] records per
//! domain and answers every lookup from it. A domain is loaded from the
//! [`MetadataStore`](crate::store::MetadataStore) on first access, wholesale,
//! and stays the source of truth until it is reloaded or evicted.
//!
//! ## Lookups
//!
//! - [`get_by_id`](PageRepository::get_by_id) matches the id only.
//! - [`get_by_route`](PageRepository::get_by_route) matches the route only.
//!
//! Both return the first match in load order, or
//! [`PageError::PageNotFound`]. With `with_content` the body is read from the
//! content store at call time; later changes to the body are not reflected.
//! A body that is missing or cannot be read comes back empty; use
//! [`load_content`](PageRepository::load_content) to tell the cases apart.
//!
//! ## Persistence
//!
//! Nothing is written implicitly. [`add`](PageRepository::add) and
//! [`replace`](PageRepository::replace) touch memory only.
//!
//! - [`save`](PageRepository::save) writes the body and nothing else.
//! - [`save_data`](PageRepository::save_data) writes the metadata document.
//! - [`commit`](PageRepository::commit) does both for one page: body first,
//!   then the metadata document, and only then the cached collection.
//!
//! ## Concurrency
//!
//! The cache sits behind a `parking_lot::RwLock`. Lookups share the read lock;
//! loading, mutation and `commit` take the write lock, so there is a single
//! writer at a time.

use crate::error::{PageError, Result};
use crate::model::{Page, Status, NOT_FOUND_ID};
use crate::store::{validate_domain, StorageBackend};
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What a save call wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub content_saved: bool,
    pub metadata_saved: bool,
}

pub struct PageRepository<B: StorageBackend> {
    /// The underlying storage backend.
    pub(crate) backend: B,
    cache: RwLock<HashMap<String, Vec<Page>>>,
}

impl<B: StorageBackend> PageRepository<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn load(&self, domain: &str) -> Result<Vec<Page>> {
        let pages = self.backend.load_or_init(domain)?;
        debug!(domain = %domain, count = pages.len(), "loaded page metadata");
        Ok(pages)
    }

    /// Run `f` over the domain's collection, loading it first if needed.
    fn with_pages<T>(&self, domain: &str, f: impl FnOnce(&[Page]) -> T) -> Result<T> {
        validate_domain(domain)?;
        {
            let cache = self.cache.read();
            if let Some(pages) = cache.get(domain) {
                return Ok(f(pages));
            }
        }

        // Another thread may have loaded it between the two locks
        let mut cache = self.cache.write();
        let pages = match cache.entry(domain.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(self.load(domain)?),
        };
        Ok(f(pages.as_slice()))
    }

    fn with_pages_mut<T>(
        &self,
        domain: &str,
        f: impl FnOnce(&mut Vec<Page>) -> Result<T>,
    ) -> Result<T> {
        validate_domain(domain)?;
        let mut cache = self.cache.write();
        let pages = match cache.entry(domain.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(self.load(domain)?),
        };
        f(pages)
    }

    fn attach_content(&self, domain: &str, mut page: Page, with_content: bool) -> Result<Page> {
        if with_content {
            // Lookups degrade to an empty body; load_content reports the cause
            page.content = match self.backend.read_content(domain, page.id) {
                Ok(Some(content)) => content,
                Ok(None) => {
                    debug!(domain = %domain, id = page.id, "no content stored for page");
                    String::new()
                }
                Err(e) => {
                    warn!(domain = %domain, id = page.id, error = %e, "unreadable page content");
                    String::new()
                }
            };
        }
        Ok(page)
    }

    /// Find a page by id.
    pub fn get_by_id(&self, domain: &str, id: i64, with_content: bool) -> Result<Page> {
        let not_found = || PageError::not_found(domain, format!("id {}", id));
        if id == NOT_FOUND_ID {
            validate_domain(domain)?;
            return Err(not_found());
        }

        let page = self
            .with_pages(domain, |pages| pages.iter().find(|p| p.id == id).cloned())?
            .ok_or_else(not_found)?;
        self.attach_content(domain, page, with_content)
    }

    /// Find a page by its route.
    pub fn get_by_route(&self, domain: &str, route: &str, with_content: bool) -> Result<Page> {
        let page = self
            .with_pages(domain, |pages| {
                pages.iter().find(|p| p.route == route).cloned()
            })?
            .ok_or_else(|| PageError::not_found(domain, format!("route {}", route)))?;
        self.attach_content(domain, page, with_content)
    }

    /// Pages and posts directly under `parent` with the given status.
    pub fn get_pages(&self, domain: &str, parent: i64, status: Status) -> Result<Vec<Page>> {
        self.with_pages(domain, |pages| {
            pages
                .iter()
                .filter(|p| p.parent == parent && p.status == status && p.is_listed())
                .cloned()
                .collect()
        })
    }

    /// Category pages in `category` with the given status.
    pub fn get_category_pages(
        &self,
        domain: &str,
        category: i64,
        status: Status,
    ) -> Result<Vec<Page>> {
        self.with_pages(domain, |pages| {
            pages
                .iter()
                .filter(|p| p.category == category && p.status == status && p.is_category())
                .cloned()
                .collect()
        })
    }

    /// The whole collection, in load order.
    pub fn get_all_pages(&self, domain: &str) -> Result<Vec<Page>> {
        self.with_pages(domain, |pages| pages.to_vec())
    }

    /// Append a page to the in-memory collection. Not persisted.
    pub fn add(&self, domain: &str, page: Page) -> Result<()> {
        if page.id == NOT_FOUND_ID {
            warn!(domain = %domain, "rejected page with reserved id");
            return Err(PageError::InvalidId(page.id));
        }

        self.with_pages_mut(domain, |pages| {
            if pages.iter().any(|p| p.id == page.id) {
                warn!(domain = %domain, id = page.id, "rejected duplicate page id");
                return Err(PageError::DuplicateId {
                    domain: domain.to_string(),
                    id: page.id,
                });
            }
            pages.push(page);
            Ok(())
        })
    }

    /// Swap the stored page having the same id for `page`. Not persisted.
    pub fn replace(&self, domain: &str, page: Page) -> Result<()> {
        self.with_pages_mut(domain, |pages| {
            let slot = pages
                .iter_mut()
                .find(|p| p.id == page.id)
                .ok_or_else(|| PageError::not_found(domain, format!("id {}", page.id)))?;
            *slot = page;
            Ok(())
        })
    }

    /// Write the page body when `save_content` is set.
    ///
    /// Metadata is left alone; use [`save_data`](Self::save_data) or
    /// [`commit`](Self::commit) to persist it.
    pub fn save(&self, domain: &str, page: &Page, save_content: bool) -> Result<SaveReport> {
        validate_domain(domain)?;
        if page.id == NOT_FOUND_ID {
            return Err(PageError::InvalidId(page.id));
        }

        let mut report = SaveReport::default();
        if save_content {
            self.backend.write_content(domain, page.id, &page.content)?;
            report.content_saved = true;
        }
        Ok(report)
    }

    /// Persist one page completely: body (if requested), then the metadata
    /// document with the page replaced or appended.
    ///
    /// A failed body write leaves metadata untouched. A failed metadata write
    /// leaves the cached collection untouched.
    pub fn commit(&self, domain: &str, page: Page, save_content: bool) -> Result<SaveReport> {
        let mut report = self.save(domain, &page, save_content)?;

        self.with_pages_mut(domain, |pages| {
            let mut next = pages.clone();
            let stored = Page {
                content: String::new(),
                ..page
            };
            match next.iter().position(|p| p.id == stored.id) {
                Some(i) => next[i] = stored,
                None => next.push(stored),
            }

            self.backend.save_index(domain, &next)?;
            *pages = next;
            Ok(())
        })?;

        report.metadata_saved = true;
        info!(domain = %domain, content = report.content_saved, "committed page");
        Ok(report)
    }

    /// (Re)load a domain from the metadata store, replacing any cached copy.
    pub fn load_data(&self, domain: &str) -> Result<()> {
        validate_domain(domain)?;
        let mut cache = self.cache.write();
        let pages = self.load(domain)?;
        cache.insert(domain.to_string(), pages);
        Ok(())
    }

    /// Write the cached collection to the metadata store.
    pub fn save_data(&self, domain: &str) -> Result<()> {
        let count = self.with_pages(domain, |pages| {
            self.backend.save_index(domain, pages).map(|_| pages.len())
        })??;
        info!(domain = %domain, count, "saved page metadata");
        Ok(())
    }

    /// The stored body, or None when the page has none.
    pub fn load_content(&self, domain: &str, id: i64) -> Result<Option<String>> {
        validate_domain(domain)?;
        self.backend.read_content(domain, id)
    }

    pub fn save_content(&self, domain: &str, id: i64, content: &str) -> Result<()> {
        validate_domain(domain)?;
        if id == NOT_FOUND_ID {
            return Err(PageError::InvalidId(id));
        }
        self.backend.write_content(domain, id, content)
    }

    /// Drop a domain from the cache. Returns whether it was loaded.
    pub fn evict(&self, domain: &str) -> bool {
        self.cache.write().remove(domain).is_some()
    }

    pub fn is_loaded(&self, domain: &str) -> bool {
        self.cache.read().contains_key(domain)
    }
}
