//! # Catalog Sources
//!
//! Where the full, unfiltered catalog comes from.
//!
//! ## Payload Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    GET {endpoint} → Vec<ProductRecord>                  │
//! │                                                                         │
//! │  transport error / timeout ───────────────► Err(RetrievalFailure)       │
//! │  HTTP status not 2xx ─────────────────────► Err(Status { status })      │
//! │  body empty, not JSON, or not an array ───► Ok(vec![])                  │
//! │  JSON array ──────────────────────────────► Ok(records)                 │
//! │      └─ element not an object ────────────► empty record, kept in place │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use async_trait::async_trait;
use katalog_core::ProductRecord;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SourceSettings;
use crate::error::{ClientError, ClientResult, RetrievalFailure};

// =============================================================================
// Catalog Source Trait
// =============================================================================

/// Provides the complete, unfiltered catalog.
///
/// Implementations must return records in catalog order. Filtering is the
/// caller's job; see [`katalog_core::filter`].
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches every record.
    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, RetrievalFailure>;
}

// =============================================================================
// Payload Decoding
// =============================================================================

/// Decodes a catalog response body.
///
/// Anything other than a JSON array decodes to an empty catalog: empty
/// bodies, bodies that are not JSON, and JSON documents of another kind.
/// A successful response is never turned into a failure here.
pub fn decode_catalog(body: &[u8]) -> Vec<ProductRecord> {
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("Catalog body is empty");
        return Vec::new();
    }

    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Catalog payload is not JSON, treating as empty");
            return Vec::new();
        }
    };

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                if !item.is_object() {
                    warn!(index, "Catalog entry is not an object, reading as empty record");
                }
                ProductRecord::from_value(item)
            })
            .collect(),
        other => {
            warn!(kind = json_kind(&other), "Catalog payload is not an array, treating as empty");
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// HTTP Source
// =============================================================================

/// Fetches the catalog with a single GET on a JSON endpoint.
///
/// ## Usage
/// ```rust,ignore
/// let config = ClientConfig::load(None)?;
/// let source = HttpCatalogSource::from_settings(&config.source)?;
/// let all = source.fetch_all().await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    endpoint: Url,
    timeout_secs: u64,
}

impl HttpCatalogSource {
    /// Creates a source for `settings.endpoint` with its request timeout.
    pub fn from_settings(settings: &SourceSettings) -> ClientResult<Self> {
        let endpoint = Url::parse(&settings.endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::InvalidEndpoint(settings.endpoint.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ClientError::HttpClient(e.to_string()))?;

        Ok(HttpCatalogSource {
            client,
            endpoint,
            timeout_secs: settings.timeout_secs,
        })
    }

    /// Returns the endpoint this source reads from.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, RetrievalFailure> {
        let start = Instant::now();
        let to_failure = |e: reqwest::Error| RetrievalFailure::from_reqwest(e, self.timeout_secs);

        debug!(endpoint = %self.endpoint, "Fetching catalog");

        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(to_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalFailure::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(to_failure)?;
        let records = decode_catalog(&body);

        info!(
            endpoint = %self.endpoint,
            count = records.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Catalog fetched"
        );

        Ok(records)
    }
}

// =============================================================================
// Static Source
// =============================================================================

/// A fixed, in-memory catalog.
///
/// Useful offline and as a stand-in for the HTTP source.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    records: Vec<ProductRecord>,
}

impl StaticCatalogSource {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        StaticCatalogSource { records }
    }

    /// Builds a catalog from a JSON document, with the same leniency as
    /// the HTTP source.
    pub fn from_json(body: &str) -> Self {
        Self::new(decode_catalog(body.as_bytes()))
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, RetrievalFailure> {
        Ok(self.records.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
