//! Locating placement group records inside a query document.
//!
//! `ceph pg ls` and `ceph pg dump` have wrapped the record list differently
//! across releases. Each known wrapping is a named [`ExtractionStrategy`];
//! [`STRATEGIES`] is tried in order and the first match wins. Results are
//! never merged across strategies.

use serde_json::Value;
use tracing::debug;

/// A named way of finding the record array in a document.
#[derive(Clone, Copy)]
pub struct ExtractionStrategy {
    pub name: &'static str,
    locate: fn(&Value) -> Option<&Vec<Value>>,
}

impl std::fmt::Debug for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionStrategy")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ExtractionStrategy {
    /// Whether this strategy applies to `doc`.
    pub fn matches(&self, doc: &Value) -> bool {
        (self.locate)(doc).is_some()
    }

    /// The records this strategy finds in `doc`, if it applies.
    pub fn records<'a>(&self, doc: &'a Value) -> Option<&'a [Value]> {
        (self.locate)(doc).map(Vec::as_slice)
    }
}

fn bare_array(doc: &Value) -> Option<&Vec<Value>> {
    doc.as_array()
}

fn top_level_pg_stats(doc: &Value) -> Option<&Vec<Value>> {
    doc.get("pg_stats")?.as_array()
}

fn nested_pg_map(doc: &Value) -> Option<&Vec<Value>> {
    doc.get("pg_map")?.get("pg_stats")?.as_array()
}

fn entries(doc: &Value) -> Option<&Vec<Value>> {
    doc.get("entries")?.as_array()
}

/// Known document shapes, most direct first.
pub static STRATEGIES: [ExtractionStrategy; 4] = [
    ExtractionStrategy {
        name: "bare-array",
        locate: bare_array,
    },
    ExtractionStrategy {
        name: "pg_stats",
        locate: top_level_pg_stats,
    },
    ExtractionStrategy {
        name: "pg_map.pg_stats",
        locate: nested_pg_map,
    },
    ExtractionStrategy {
        name: "entries",
        locate: entries,
    },
];

/// The first strategy that applies to `doc`.
pub fn select_strategy(doc: &Value) -> Option<&'static ExtractionStrategy> {
    STRATEGIES.iter().find(|strategy| strategy.matches(doc))
}

/// Records found in `doc`, or an empty slice when no shape matches.
///
/// An empty result is not an error here; the pipeline decides that.
pub fn extract_records(doc: &Value) -> &[Value] {
    match select_strategy(doc) {
        Some(strategy) => {
            let records = strategy.records(doc).unwrap_or_default();
            debug!(
                strategy = strategy.name,
                records = records.len(),
                "located placement group records"
            );
            records
        }
        None => {
            debug!("no known document shape matched");
            &[]
        }
    }
}
