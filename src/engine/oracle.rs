use std::collections::HashMap;

use crate::catalog::BaselineStatus;

/// Precise compatibility oracle for exact compatibility keys.
///
/// Modeled as an optional strategy object: the resolver checks for its
/// presence explicitly, and absence is a valid configuration rather than
/// a failure.
pub trait BaselineOracle: Send + Sync {
    /// Status for an exact compatibility key, or `None` when the oracle
    /// has no opinion on it.
    fn status(&self, compat_key: &str) -> Option<BaselineStatus>;
}

/// Table-backed oracle over a fixed key/status map. Useful for curated
/// datasets and for tests.
#[derive(Debug, Default)]
pub struct StaticOracle {
    table: HashMap<String, BaselineStatus>,
}

impl StaticOracle {
    pub fn new(table: HashMap<String, BaselineStatus>) -> Self {
        Self { table }
    }

    pub fn with_entry(mut self, key: impl Into<String>, status: BaselineStatus) -> Self {
        self.table.insert(key.into(), status);
        self
    }
}

impl BaselineOracle for StaticOracle {
    fn status(&self, compat_key: &str) -> Option<BaselineStatus> {
        self.table.get(compat_key).copied()
    }
}
