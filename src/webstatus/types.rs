use serde::{Deserialize, Serialize};

use crate::catalog::BaselineStatus;

/// Payload returned by the webstatus feature-search endpoint, and the
/// shape stored per query in the offline cache file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub data: Vec<FeatureRecord>,
}

/// Lightweight feature record from a query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub feature_id: String,
    #[serde(default)]
    pub baseline: Option<BaselineField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineField {
    pub status: BaselineStatus,
}

impl FeatureRecord {
    pub fn status(&self) -> BaselineStatus {
        self.baseline
            .as_ref()
            .map(|b| b.status)
            .unwrap_or(BaselineStatus::Unknown)
    }
}
