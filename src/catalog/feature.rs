//! Feature catalog data model.
//!
//! Compatibility sources disagree on how they encode a Baseline status:
//! some use a boolean, some a string label, and the label vocabulary
//! varies (`"widely"`/`"high"`, `"newly"`/`"low"`, `"limited"`). All of
//! them are folded into [`BaselineStatus`] at deserialization time; no
//! code after load ever inspects a raw encoding.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Aggregate Baseline status of a web feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineStatus {
    Widely,
    Newly,
    Limited,
    Unknown,
}

impl BaselineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Widely => "widely",
            Self::Newly => "newly",
            Self::Limited => "limited",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BaselineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw on-disk encodings of a Baseline status.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawBaseline {
    Flag(bool),
    Label(String),
}

impl From<RawBaseline> for BaselineStatus {
    fn from(raw: RawBaseline) -> Self {
        match raw {
            RawBaseline::Flag(true) => Self::Widely,
            RawBaseline::Flag(false) => Self::Limited,
            RawBaseline::Label(label) => match label.as_str() {
                "widely" | "high" => Self::Widely,
                "newly" | "low" => Self::Newly,
                "limited" => Self::Limited,
                _ => Self::Unknown,
            },
        }
    }
}

impl<'de> Deserialize<'de> for BaselineStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(RawBaseline::deserialize(deserializer)?.into())
    }
}

impl Serialize for BaselineStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One web feature from the catalog. Immutable after load.
#[derive(Debug, Clone)]
pub struct FeatureEntry {
    /// Stable feature identifier.
    pub id: String,
    /// Dotted compatibility keys; uniqueness across entries is not
    /// guaranteed.
    pub compat_keys: Vec<String>,
    pub status: BaselineStatus,
}

impl FeatureEntry {
    pub fn new(id: impl Into<String>, compat_keys: Vec<String>, status: BaselineStatus) -> Self {
        Self {
            id: id.into(),
            compat_keys,
            status,
        }
    }
}

/// Curated override for one exact value-key. Always wins over automated
/// sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionRule {
    pub reason: String,
}

/// On-disk catalog entry: `{ compat_features, status: { baseline } }`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawFeature {
    #[serde(default)]
    pub compat_features: Vec<String>,
    #[serde(default)]
    pub status: Option<RawStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStatus {
    #[serde(default)]
    pub baseline: Option<BaselineStatus>,
}

impl RawFeature {
    pub fn into_entry(self, id: String) -> FeatureEntry {
        let status = self
            .status
            .and_then(|s| s.baseline)
            .unwrap_or(BaselineStatus::Unknown);
        FeatureEntry::new(id, self.compat_features, status)
    }
}

/// Catalog files come either wrapped (`{ "features": { ... } }`) or as a
/// bare feature map. A `BTreeMap` keeps entry order deterministic.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCatalog {
    Wrapped {
        features: BTreeMap<String, RawFeature>,
    },
    Bare(BTreeMap<String, RawFeature>),
}

impl RawCatalog {
    pub fn into_entries(self) -> Vec<FeatureEntry> {
        let map = match self {
            Self::Wrapped { features } => features,
            Self::Bare(map) => map,
        };
        map.into_iter()
            .map(|(id, raw)| raw.into_entry(id))
            .collect()
    }
}
