//! # katalog-client: Catalog Retrieval and Search State
//!
//! Fetches the remote product catalog and keeps the state of the last
//! search: the matched records, a busy flag, a status message, and the
//! currently selected record.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        katalog-client                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 CatalogStore<S: CatalogSource>                   │  │
//! │  │                                                                  │  │
//! │  │  search(query) ─► fetch_all ─► katalog_core::filter ─► state     │  │
//! │  │  select(record) / clear_selected()                               │  │
//! │  │  results() • is_busy() • status_message() • selected()           │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┴─────────────────────┐                  │
//! │         ▼                                           ▼                   │
//! │  ┌────────────────────┐                  ┌────────────────────────┐    │
//! │  │ HttpCatalogSource  │                  │ StaticCatalogSource    │    │
//! │  │ GET {endpoint}     │                  │ in-memory records      │    │
//! │  │ reqwest + timeout  │                  │                        │    │
//! │  └────────────────────┘                  └────────────────────────┘    │
//! │                                                                         │
//! │  ClientConfig: defaults ◄ katalog.toml ◄ KATALOG_* env                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use katalog_client::{CatalogStore, ClientConfig, HttpCatalogSource};
//!
//! let config = ClientConfig::load(None)?;
//! let store = Arc::new(CatalogStore::new(HttpCatalogSource::from_settings(&config.source)?));
//!
//! let matched = store.search("kopi").await?;
//! println!("{}", store.status_message()); // "Showing 3 products (of 40)."
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod source;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ClientConfig, RetrySettings, SourceSettings};
pub use error::{ClientError, ClientResult, RetrievalFailure};
pub use source::{decode_catalog, CatalogSource, HttpCatalogSource, StaticCatalogSource};
pub use store::{CatalogStore, StoreSnapshot, FAILURE_NOTICE};

pub use katalog_core::{FieldValue, ProductRecord};
