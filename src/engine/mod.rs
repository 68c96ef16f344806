//! The Baseline resolution engine.
//!
//! Takes a `(property, value)` pair plus the loaded knowledge sources and
//! produces a single [`Verdict`] with a justification and a provenance
//! label:
//! - `resolver`: the source-precedence decision procedure
//! - `oracle`: optional precise-lookup strategy seam
//! - `verdict`: outcome, source, and consumer-facing types

mod oracle;
mod resolver;
mod verdict;

pub use oracle::{BaselineOracle, StaticOracle};
pub use resolver::Resolver;
pub use verdict::{DeclarationVerdict, Outcome, Source, Verdict};
