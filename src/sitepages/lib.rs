//! # Sitepages Architecture
//!
//! Sitepages is the **page/post repository** of a small content system. It keeps
//! structured metadata for every page and post of a site (a *domain*) and stores
//! each page's rendered body in its own file.
//!
//! Request decoding, response envelopes and anything transport related belong to
//! the caller. This crate is called with a domain string and plain arguments.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Caller (CLI, web handler, ...)                             │
//! │  - Decodes input, serializes results                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repository (repository.rs)                                 │
//! │  - In-memory collection per domain, loaded lazily           │
//! │  - Lookups by id / route, filtered listings                 │
//! │  - Add, replace, save, commit                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - MetadataStore: one JSON document per domain              │
//! │  - ContentStore: one body file per page                     │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Errors
//!
//! Nothing in the library panics or exits on storage failures. A corrupt metadata
//! document, a failed write or a missing page all come back as
//! [`error::PageError`], and the host decides whether to abort or degrade.
//!
//! ## Quick Example
//!
//! ```no_run
//! use sitepages::model::{Page, Status};
//! use sitepages::repository::PageRepository;
//! use sitepages::store::fs_backend::FsBackend;
//!
//! # fn main() -> sitepages::error::Result<()> {
//! let repo = PageRepository::with_backend(FsBackend::new("/srv/sites".into()));
//!
//! let about = Page::new(2, "About", "/about")
//!     .with_template("page")
//!     .with_status(Status::Published)
//!     .with_content("<h1>About</h1>");
//! repo.commit("example.com", about, true)?;
//!
//! let page = repo.get_by_route("example.com", "/about", true)?;
//! assert_eq!(page.content, "<h1>About</h1>");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`repository`]: The page repository, entry point for all operations
//! - [`store`]: Storage traits and implementations
//! - [`model`]: Core data types (`Page`, `Status`, `PageType`)
//! - [`config`]: Store configuration and the process-wide root path
//! - [`init`]: Wiring config, root and filesystem storage together
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod repository;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
