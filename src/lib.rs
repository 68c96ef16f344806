//! Baseline resolution for CSS declarations.
//!
//! Resolves a `(property, value)` pair against several sources of
//! browser-compatibility knowledge (a feature catalog, a curated
//! exception table, prefetched webstatus results, and an optional live
//! lookup) and produces a single verdict with a justification and a
//! provenance label.

pub mod bcd;
pub mod catalog;
pub mod config;
pub mod css;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod output;
pub mod webstatus;

pub use catalog::{BaselineStatus, ExceptionRule, FeatureEntry, KnowledgeBase};
pub use config::EngineConfig;
pub use css::{Declaration, extract_declarations};
pub use engine::{BaselineOracle, DeclarationVerdict, Outcome, Resolver, Source, Verdict};
pub use error::{BaselineError, Result};
pub use webstatus::WebstatusClient;
