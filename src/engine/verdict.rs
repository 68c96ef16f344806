use std::fmt;

use serde::Serialize;

/// Final judgement for one declaration. `Unknown` is a valid terminal
/// outcome, not an error: it means no source had an opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Baseline,
    NotBaseline,
    Unknown,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::NotBaseline => "not baseline",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a verdict: which knowledge source decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Exception,
    Catalog,
    RemoteCache,
    RemoteLive,
    Heuristic,
    None,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exception => "exception",
            Self::Catalog => "catalog",
            Self::RemoteCache => "remote-cache",
            Self::RemoteLive => "remote-live",
            Self::Heuristic => "heuristic",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine output for one declaration: outcome, justification, provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub outcome: Outcome,
    pub reason: String,
    pub source: Source,
}

impl Verdict {
    pub fn new(outcome: Outcome, reason: impl Into<String>, source: Source) -> Self {
        Self {
            outcome,
            reason: reason.into(),
            source,
        }
    }

    pub fn unknown() -> Self {
        Self::new(
            Outcome::Unknown,
            "no compatibility source has an opinion; requires manual verification",
            Source::None,
        )
    }
}

/// Consumer-facing surface: a verdict tied back to its declaration and
/// source location.
#[derive(Debug, Clone, Serialize)]
pub struct DeclarationVerdict {
    pub property: String,
    pub value: String,
    pub line: usize,
    #[serde(flatten)]
    pub verdict: Verdict,
}
