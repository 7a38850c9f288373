//! # Query Engine
//!
//! Narrows a full catalog to the records matching a free-text query.
//!
//! ## Matching Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How A Record Is Matched                              │
//! │                                                                         │
//! │  raw query "  Rp 500 "                                                  │
//! │       │                                                                 │
//! │       ├── trim ──► "Rp 500"   (empty? → every record matches)           │
//! │       ├── normalize ──► needle "rp500"                                  │
//! │       └── digits only ──► digits "500"                                  │
//! │                                                                         │
//! │  A record matches when ANY of:                                          │
//! │    1. normalize(name)      contains needle                              │
//! │    2. normalize(category)  contains needle                              │
//! │    3. digits non-empty AND (price text OR stock text contains digits)   │
//! │    4. normalize(price text) OR normalize(stock text) contains needle    │
//! │                                                                         │
//! │  Output keeps the catalog's order; nothing is re-sorted.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rule 3 is what lets `"280"` find a product priced `28000`, and lets
//! `"Rp 5.000"` find one priced `5000`.

use serde::{Deserialize, Serialize};

use crate::normalize::{digits_only, normalize};
use crate::types::ProductRecord;

// =============================================================================
// Query
// =============================================================================

/// A raw query prepared for matching.
///
/// Built once per search so every record is tested against the same needle
/// without re-normalizing the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    needle: String,
    digits: String,
    match_all: bool,
}

impl Query {
    /// Prepares `raw` for matching.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        Query {
            needle: normalize(trimmed),
            digits: digits_only(trimmed),
            match_all: trimmed.is_empty(),
        }
    }

    /// True when the trimmed query is empty and every record matches.
    pub fn is_match_all(&self) -> bool {
        self.match_all
    }

    /// The normalized query.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// The ASCII digits of the query.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Tests a single record.
    pub fn matches(&self, record: &ProductRecord) -> bool {
        if self.match_all {
            return true;
        }

        if normalize(&record.name_text()).contains(&self.needle)
            || normalize(&record.category_text()).contains(&self.needle)
        {
            return true;
        }

        let price = record.price_text();
        let stock = record.stock_text();

        if !self.digits.is_empty()
            && (price.contains(self.digits.as_str()) || stock.contains(self.digits.as_str()))
        {
            return true;
        }

        normalize(&price).contains(&self.needle) || normalize(&stock).contains(&self.needle)
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Result of [`filter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutcome {
    /// Matching records in catalog order.
    pub matched: Vec<ProductRecord>,
    /// Size of the catalog before filtering.
    pub total: usize,
    /// Human-readable summary, e.g. `"Showing 1 products (of 2)."`.
    pub status_message: String,
}

/// Formats the summary line shown after a search.
pub fn status_message(matched: usize, total: usize) -> String {
    format!("Showing {} products (of {}).", matched, total)
}

/// Filters `records` by `raw_query`, preserving their order.
///
/// An empty or all-whitespace query returns `records` unchanged. Never
/// fails: absent fields read as empty text and simply don't match.
pub fn filter(records: Vec<ProductRecord>, raw_query: &str) -> QueryOutcome {
    let total = records.len();
    let query = Query::parse(raw_query);

    let matched: Vec<ProductRecord> = if query.is_match_all() {
        records
    } else {
        records.into_iter().filter(|r| query.matches(r)).collect()
    };

    QueryOutcome {
        status_message: status_message(matched.len(), total),
        matched,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
