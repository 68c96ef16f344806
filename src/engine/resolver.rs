use tracing::debug;

use crate::bcd;
use crate::catalog::{BaselineStatus, KnowledgeBase};
use crate::config::HeuristicConfig;
use crate::css::Declaration;
use crate::matcher;
use crate::webstatus::{QueryResponse, WebstatusClient};

use super::oracle::BaselineOracle;
use super::verdict::{DeclarationVerdict, Outcome, Source, Verdict};

/// The resolution orchestrator.
///
/// Consults knowledge sources in priority order: curated exceptions, the
/// precise oracle (when configured), the scored catalog match, prefetched
/// webstatus results, a property-level catalog fallback, a live webstatus
/// query (when networking is enabled), and finally a prefix heuristic.
/// Borrows everything read-only; the only mutation anywhere in a
/// resolution is the webstatus client's own cache.
pub struct Resolver<'a> {
    kb: &'a KnowledgeBase,
    heuristic: &'a HeuristicConfig,
    client: Option<&'a WebstatusClient>,
    oracle: Option<&'a dyn BaselineOracle>,
}

impl<'a> Resolver<'a> {
    pub fn new(kb: &'a KnowledgeBase, heuristic: &'a HeuristicConfig) -> Self {
        Self {
            kb,
            heuristic,
            client: None,
            oracle: None,
        }
    }

    pub fn with_client(mut self, client: &'a WebstatusClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_oracle(mut self, oracle: &'a dyn BaselineOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub async fn resolve_declaration(&self, decl: &Declaration) -> DeclarationVerdict {
        let verdict = self.resolve(&decl.property, &decl.value).await;
        DeclarationVerdict {
            property: decl.property.clone(),
            value: decl.value.clone(),
            line: decl.line,
            verdict,
        }
    }

    /// Resolve one `(property, value)` pair to a verdict.
    ///
    /// Infallible: every path ends in a verdict, and `Unknown` is a valid
    /// terminal outcome rather than an error.
    pub async fn resolve(&self, property: &str, value: &str) -> Verdict {
        let value_key = bcd::value_key(property, value);
        debug!(property, value, key = %value_key, "Resolving declaration");

        // 1. Curated exceptions always win.
        if let Some(rule) = self.kb.exception(&value_key) {
            return Verdict::new(Outcome::NotBaseline, rule.reason.clone(), Source::Exception);
        }

        // 2. Precise oracle, when configured.
        if let Some(oracle) = self.oracle {
            if oracle.status(&value_key) == Some(BaselineStatus::Limited) {
                return Verdict::new(
                    Outcome::NotBaseline,
                    format!("{} has limited availability in precise compatibility data", value_key),
                    Source::Catalog,
                );
            }
        }

        // 3. Scored catalog match. Newly/Unknown statuses fall through to
        //    the remaining sources.
        if let Some(m) = matcher::best_match(self.kb.features(), property, value) {
            match m.entry.status {
                BaselineStatus::Limited => {
                    return Verdict::new(
                        Outcome::NotBaseline,
                        format!("feature '{}' is limited (matched key {})", m.entry.id, m.key),
                        Source::Catalog,
                    );
                }
                BaselineStatus::Widely => {
                    return Verdict::new(
                        Outcome::Baseline,
                        format!(
                            "feature '{}' is widely available (matched key {})",
                            m.entry.id, m.key
                        ),
                        Source::Catalog,
                    );
                }
                status => {
                    debug!(feature = %m.entry.id, %status, "Catalog match unresolved, falling through");
                }
            }
        }

        // 4. Prefetched webstatus results.
        for (query, response) in self.kb.webstatus_entries() {
            if let Some(verdict) = scan_records(property, query, response, Source::RemoteCache) {
                return verdict;
            }
        }

        // 5. Property-level (value-agnostic) catalog fallback.
        let property_key = bcd::property_key(property);
        if let Some(entry) = matcher::property_level(self.kb.features(), &property_key) {
            match entry.status {
                BaselineStatus::Limited => {
                    return Verdict::new(
                        Outcome::NotBaseline,
                        format!("property-level feature '{}' is limited", entry.id),
                        Source::Catalog,
                    );
                }
                BaselineStatus::Widely => {
                    return Verdict::new(
                        Outcome::Baseline,
                        format!("property-level feature '{}' is widely available", entry.id),
                        Source::Catalog,
                    );
                }
                _ => {}
            }
        }

        // 6. Live lookup, gated by the client's enablement flag.
        if let Some(client) = self.client {
            if let Some(response) = client.query(property).await {
                if let Some(verdict) = scan_records(property, property, &response, Source::RemoteLive)
                {
                    return verdict;
                }
            }
        }

        // 7. Long-stable property prefixes.
        if self.heuristic.enabled {
            if let Some(prefix) = self
                .heuristic
                .prefixes
                .iter()
                .find(|p| property.starts_with(p.as_str()))
            {
                return Verdict::new(
                    Outcome::Baseline,
                    format!("property matches long-stable prefix '{}'", prefix),
                    Source::Heuristic,
                );
            }
        }

        // 8. Nobody has an opinion.
        Verdict::unknown()
    }
}

/// Scan one webstatus result set for a record about this property. The
/// match is by feature-id substring, the same fuzziness the cache was
/// prefetched with.
fn scan_records(
    property: &str,
    query: &str,
    response: &QueryResponse,
    source: Source,
) -> Option<Verdict> {
    for record in &response.data {
        if !record.feature_id.contains(property) {
            continue;
        }
        match record.status() {
            BaselineStatus::Limited => {
                return Some(Verdict::new(
                    Outcome::NotBaseline,
                    format!(
                        "webstatus feature '{}' is limited (query '{}')",
                        record.feature_id, query
                    ),
                    source,
                ));
            }
            BaselineStatus::Widely => {
                return Some(Verdict::new(
                    Outcome::Baseline,
                    format!(
                        "webstatus feature '{}' is widely available (query '{}')",
                        record.feature_id, query
                    ),
                    source,
                ));
            }
            _ => {}
        }
    }
    None
}
