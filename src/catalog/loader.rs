use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::error::Result;
use crate::webstatus::QueryResponse;

use super::feature::{ExceptionRule, FeatureEntry, RawCatalog};

/// In-memory knowledge base: the feature catalog, the curated exception
/// table, and the prefetched webstatus result set.
///
/// Loaded once at startup and read-only afterwards; the resolver borrows
/// it for the lifetime of a run. Any source that fails to load is simply
/// empty, which degrades resolutions toward `unknown` rather than failing.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    features: Vec<FeatureEntry>,
    exceptions: HashMap<String, ExceptionRule>,
    webstatus_cache: BTreeMap<String, QueryResponse>,
}

impl KnowledgeBase {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load all three sources from disk. Never fails: missing files are
    /// normal (logged at debug), malformed files are logged as warnings,
    /// and in both cases the source stays empty.
    pub async fn load(data: &DataConfig) -> Self {
        let features = match read_json::<RawCatalog>(&data.features_path()).await {
            Ok(Some(catalog)) => catalog.into_entries(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(path = %data.features_path().display(), error = %e, "Failed to load feature catalog");
                Vec::new()
            }
        };

        let exceptions = match read_json::<HashMap<String, ExceptionRule>>(
            &data.exceptions_path(),
        )
        .await
        {
            Ok(Some(map)) => map,
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!(path = %data.exceptions_path().display(), error = %e, "Failed to load exception table");
                HashMap::new()
            }
        };

        let webstatus_cache = match read_json::<BTreeMap<String, QueryResponse>>(
            &data.webstatus_cache_path(),
        )
        .await
        {
            Ok(Some(map)) => map,
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(path = %data.webstatus_cache_path().display(), error = %e, "Failed to load webstatus cache");
                BTreeMap::new()
            }
        };

        info!(
            features = features.len(),
            exceptions = exceptions.len(),
            cached_queries = webstatus_cache.len(),
            "Knowledge base loaded"
        );

        Self {
            features,
            exceptions,
            webstatus_cache,
        }
    }

    pub fn with_features(mut self, features: Vec<FeatureEntry>) -> Self {
        self.features = features;
        self
    }

    pub fn with_exception(mut self, key: impl Into<String>, reason: impl Into<String>) -> Self {
        self.exceptions.insert(
            key.into(),
            ExceptionRule {
                reason: reason.into(),
            },
        );
        self
    }

    pub fn with_cached_query(mut self, query: impl Into<String>, response: QueryResponse) -> Self {
        self.webstatus_cache.insert(query.into(), response);
        self
    }

    pub fn features(&self) -> &[FeatureEntry] {
        &self.features
    }

    pub fn exception(&self, value_key: &str) -> Option<&ExceptionRule> {
        self.exceptions.get(value_key)
    }

    /// Prefetched webstatus results in deterministic (sorted) query order.
    pub fn webstatus_entries(&self) -> impl Iterator<Item = (&str, &QueryResponse)> {
        self.webstatus_cache
            .iter()
            .map(|(query, response)| (query.as_str(), response))
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.exceptions.is_empty() && self.webstatus_cache.is_empty()
    }
}

/// Read and parse a JSON file. `Ok(None)` means the file does not exist.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "Data file not present");
        return Ok(None);
    }
    let content = fs::read_to_string(path).await?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Write a webstatus result set to the cache file used by later offline
/// runs. Creates parent directories as needed.
pub async fn write_webstatus_cache(
    path: &Path,
    results: &BTreeMap<String, QueryResponse>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json).await?;
    info!(path = %path.display(), queries = results.len(), "Wrote webstatus cache");
    Ok(())
}
