//! Knowledge base loading and the feature catalog data model.
//!
//! - `feature`: catalog entries, exception rules, status normalization
//! - `loader`: `KnowledgeBase` assembly from the three data files

mod feature;
mod loader;

pub use feature::{BaselineStatus, ExceptionRule, FeatureEntry};
pub use loader::{KnowledgeBase, write_webstatus_cache};
