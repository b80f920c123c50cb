//! Projection of raw placement group records into [`NormalizedRow`]s.
//!
//! Field names drifted between Ceph releases, so every derived field walks a
//! fallback chain that prefers the more authoritative key first.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::stamp::{parse_stamp, StampOutcome};

/// Placeholder stored in `raw_timestamp` when the record has no stamp.
pub const NEVER_LITERAL: &str = "never";

/// Ceph's marker for an empty slot in an erasure-coded acting set.
pub const CRUSH_ITEM_NONE: i64 = 0x7fff_ffff;

/// One placement group, ready to rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRow {
    /// PG identifier such as `1.2f`; empty when the record had none.
    pub id: String,
    /// Epoch seconds of the last deep scrub, `0` when never or unknown.
    pub instant: i64,
    /// Primary OSD, if any field allowed deriving one.
    pub primary: Option<String>,
    /// Acting (or up) set in source order.
    pub replicas: Vec<String>,
    /// The stamp exactly as reported, or [`NEVER_LITERAL`].
    pub raw_timestamp: String,
}

impl NormalizedRow {
    /// Replica set as a comma separated list.
    pub fn replica_list(&self) -> String {
        self.replicas.join(",")
    }
}

/// Split a device list on commas and whitespace, dropping empty tokens.
pub fn split_device_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_no_device(id: i64) -> bool {
    id < 0 || id == CRUSH_ITEM_NONE
}

/// A textual device id, or `None` for blanks and the "no device" markers.
fn device_token(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    match token.parse::<i64>() {
        Ok(id) if is_no_device(id) => None,
        _ => Some(token.to_string()),
    }
}

fn device_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(id) if is_no_device(id) => None,
            _ => Some(n.to_string()),
        },
        Value::String(s) => device_token(s),
        _ => None,
    }
}

fn device_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(device_id).collect(),
        Some(Value::String(s)) => split_device_tokens(s).filter_map(device_token).collect(),
        _ => Vec::new(),
    }
}

fn resolve_primary(record: &Value, acting: &[String], up: &[String]) -> Option<String> {
    record
        .get("acting_primary")
        .and_then(device_id)
        .or_else(|| record.get("up_primary").and_then(device_id))
        .or_else(|| acting.first().cloned())
        .or_else(|| up.first().cloned())
}

/// Project one raw record. Never fails; missing fields degrade to defaults.
pub fn project_record(record: &Value) -> NormalizedRow {
    let id = record.get("pgid").and_then(scalar_text).unwrap_or_default();
    if id.is_empty() {
        warn!("placement group record has no pgid");
    }

    let raw_timestamp = record
        .get("last_deep_scrub_stamp")
        .and_then(scalar_text)
        .unwrap_or_else(|| NEVER_LITERAL.to_string());

    let stamp_input = if raw_timestamp == NEVER_LITERAL {
        ""
    } else {
        raw_timestamp.as_str()
    };
    let outcome = parse_stamp(stamp_input);
    if let StampOutcome::Unparsed { input, reason } = &outcome {
        warn!(pgid = %id, stamp = %input, %reason, "unparsable deep scrub stamp, ranking as never scrubbed");
    }

    let acting = device_list(record.get("acting"));
    let up = device_list(record.get("up"));
    let primary = resolve_primary(record, &acting, &up);
    let replicas = if acting.is_empty() { up } else { acting };

    NormalizedRow {
        id,
        instant: outcome.epoch_seconds(),
        primary,
        replicas,
        raw_timestamp,
    }
}

/// Project every record, preserving input order.
pub fn project_records(records: &[Value]) -> Vec<NormalizedRow> {
    records.iter().map(project_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_prefers_acting_primary() {
        let row = project_record(&json!({
            "pgid": "1.0",
            "acting_primary": 4,
            "up_primary": 5,
            "acting": [6, 7],
            "up": [8, 9],
        }));
        assert_eq!(row.primary.as_deref(), Some("4"));
        assert_eq!(row.replicas, vec!["6", "7"]);
    }

    #[test]
    fn test_primary_fallback_chain() {
        let up_primary = project_record(&json!({"pgid": "1.0", "up_primary": 5, "acting": [6]}));
        assert_eq!(up_primary.primary.as_deref(), Some("5"));

        let acting_head = project_record(&json!({"pgid": "1.0", "acting": [6, 7], "up": [8]}));
        assert_eq!(acting_head.primary.as_deref(), Some("6"));

        let up_head = project_record(&json!({"pgid": "1.0", "up": [8, 9]}));
        assert_eq!(up_head.primary.as_deref(), Some("8"));
        assert_eq!(up_head.replicas, vec!["8", "9"]);

        let none = project_record(&json!({"pgid": "1.0"}));
        assert_eq!(none.primary, None);
        assert!(none.replicas.is_empty());
    }

    #[test]
    fn test_negative_primary_is_absent() {
        let row = project_record(&json!({"pgid": "1.0", "acting_primary": -1, "up": [3]}));
        assert_eq!(row.primary.as_deref(), Some("3"));
    }

    #[test]
    fn test_textual_no_device_markers_are_dropped() {
        let row = project_record(&json!({
            "pgid": "1.0",
            "acting_primary": "-1",
            "up_primary": "-1",
            "acting": "-1,3",
        }));
        assert_eq!(row.primary.as_deref(), Some("3"));
        assert_eq!(row.replicas, vec!["3"]);

        let row = project_record(&json!({"pgid": "1.1", "acting": ["-1", "2147483647", "8"]}));
        assert_eq!(row.primary.as_deref(), Some("8"));
        assert_eq!(row.replicas, vec!["8"]);

        let row = project_record(&json!({"pgid": "1.2", "acting_primary": "-1", "up": ["-1"]}));
        assert_eq!(row.primary, None);
        assert!(row.replicas.is_empty());
    }

    #[test]
    fn test_empty_acting_falls_back_to_up() {
        let row = project_record(&json!({"pgid": "1.0", "acting": [], "up": [1, 2]}));
        assert_eq!(row.replicas, vec!["1", "2"]);
        assert_eq!(row.primary.as_deref(), Some("1"));
    }

    #[test]
    fn test_crush_item_none_is_skipped() {
        let row = project_record(&json!({"pgid": "3.1", "acting": [2147483647, 4, 9]}));
        assert_eq!(row.replicas, vec!["4", "9"]);
        assert_eq!(row.primary.as_deref(), Some("4"));
    }

    #[test]
    fn test_string_device_list_is_split() {
        let row = project_record(&json!({"pgid": "1.0", "acting": "7, 19 3"}));
        assert_eq!(row.replicas, vec!["7", "19", "3"]);
    }

    #[test]
    fn test_missing_stamp_reads_never() {
        let row = project_record(&json!({"pgid": "1.0"}));
        assert_eq!(row.raw_timestamp, NEVER_LITERAL);
        assert_eq!(row.instant, 0);
    }

    #[test]
    fn test_missing_pgid_still_projects() {
        let row = project_record(&json!({"last_deep_scrub_stamp": "2025-07-14T03:12:45Z"}));
        assert_eq!(row.id, "");
        assert_eq!(row.instant, 1_752_462_765);
    }

    #[test]
    fn test_raw_timestamp_is_kept_verbatim() {
        let row = project_record(&json!({
            "pgid": "2.a3",
            "last_deep_scrub_stamp": "2025-07-15T08:02:17.000123+0000",
        }));
        assert_eq!(row.raw_timestamp, "2025-07-15T08:02:17.000123+0000");
        assert_eq!(row.instant, 1_752_566_537);
    }

    #[test]
    fn test_replica_list_joins_with_commas() {
        let row = project_record(&json!({"pgid": "1.0", "acting": [7, 19, 3]}));
        assert_eq!(row.replica_list(), "7,19,3");
    }
}
