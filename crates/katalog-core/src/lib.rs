//! # katalog-core: Pure Lookup Logic
//!
//! Record types, text normalization and the query engine behind product
//! lookup. Nothing in this crate performs I/O or holds state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Katalog Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 katalog-cli (or any UI layer)                   │   │
//! │  │        search("kopi") ──► print results + status message        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                       katalog-client                            │   │
//! │  │      CatalogStore (busy, results, message, selected)            │   │
//! │  │      CatalogSource ──► HTTP GET /productData                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ filter(all, query)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ katalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐   ┌─────────────┐   ┌─────────────┐          │   │
//! │  │   │    types    │   │  normalize  │   │    query    │          │   │
//! │  │   │ProductRecord│   │ NFD, marks, │   │ Query,      │          │   │
//! │  │   │ FieldValue  │   │ case, space │   │ filter      │          │   │
//! │  │   └─────────────┘   └─────────────┘   └─────────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use katalog_core::{filter, ProductRecord};
//!
//! let catalog = vec![
//!     ProductRecord::new().with_name("Teh Botol").with_category("Minuman").with_price(5000_i64),
//!     ProductRecord::new().with_name("Café Latte").with_category("Minuman").with_price(18000_i64),
//! ];
//!
//! let outcome = filter(catalog, "cafe");
//! assert_eq!(outcome.matched.len(), 1);
//! assert_eq!(outcome.status_message, "Showing 1 products (of 2).");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod normalize;
pub mod query;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use normalize::{digits_only, normalize, normalize_opt};
pub use query::{filter, status_message, Query, QueryOutcome};
pub use types::{FieldValue, ProductRecord};
