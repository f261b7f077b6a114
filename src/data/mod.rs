//! Data sources and ingestion.
//!
//! - built-in sample data (`sample`)
//! - REST endpoint client (`api`)
//! - CSV import (`ingest`)
//! - source selection with fallback (`fetcher`)

pub mod api;
pub mod fetcher;
pub mod ingest;
pub mod sample;

pub use api::{ApiClient, ApiOptions};
pub use fetcher::{FetchOutcome, FetchParams, fetch_from_source, fetch_with_fallback};
pub use sample::default_dataset;
