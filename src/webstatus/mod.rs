//! Remote feature-status lookups against webstatus.dev.
//!
//! - `client`: network-gated query client with retry and a runtime cache
//! - `types`: wire payloads, shared with the offline cache file

mod client;
mod types;

pub use client::{HttpTransport, Transport, WebstatusClient};
pub use types::{BaselineField, FeatureRecord, QueryResponse};
