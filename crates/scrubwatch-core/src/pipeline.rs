//! End-to-end report construction: text -> records -> rows -> ranking.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::error::{Result, ScrubError};
use crate::extract::extract_records;
use crate::project::{project_records, NormalizedRow};
use crate::rank::rank;
use crate::remediation::RemediationPlan;
use crate::source::RecordSource;

/// A finished report. Built only once every row has been ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrubReport {
    /// Placement groups considered before truncation.
    pub total: usize,
    /// The stalest rows, oldest first.
    pub rows: Vec<NormalizedRow>,
    /// Present when the config asked for commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<RemediationPlan>,
}

/// Build a report from an already parsed document.
pub fn build_report_from_value(doc: &Value, config: &ReportConfig) -> Result<ScrubReport> {
    let records = extract_records(doc);
    if records.is_empty() {
        return Err(ScrubError::EmptySource);
    }

    let rows = project_records(records);
    let total = rows.len();
    let ranked = rank(rows, config.count)?;
    debug!(total, shown = ranked.len(), "ranked placement groups");

    let remediation = config
        .emit_commands
        .then(|| RemediationPlan::from_ranked(&ranked, config.scrubs));

    Ok(ScrubReport {
        total,
        rows: ranked,
        remediation,
    })
}

/// Parse JSON text and build a report.
pub fn build_report(text: &str, config: &ReportConfig) -> Result<ScrubReport> {
    let doc: Value = serde_json::from_str(text)?;
    build_report_from_value(&doc, config)
}

/// Fetch from `source` and build a report.
pub fn run_report(source: &dyn RecordSource, config: &ReportConfig) -> Result<ScrubReport> {
    let text = source.fetch()?;
    info!(source = %source.describe(), bytes = text.len(), "loaded placement group document");
    build_report(&text, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticSource(&'static str);

    impl RecordSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        fn fetch(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_malformed_text_is_malformed_source() {
        let err = build_report("ceph: command not found", &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ScrubError::MalformedSource(_)));
    }

    #[test]
    fn test_no_records_is_empty_source() {
        let err = build_report_from_value(&json!({"pg_stats": []}), &ReportConfig::default())
            .unwrap_err();
        assert!(matches!(err, ScrubError::EmptySource));

        let err = build_report_from_value(&json!({"unrelated": 1}), &ReportConfig::default())
            .unwrap_err();
        assert!(matches!(err, ScrubError::EmptySource));
    }

    #[test]
    fn test_remediation_follows_config() {
        let doc = json!([{"pgid": "1.0", "acting": [1, 2]}]);

        let with = build_report_from_value(&doc, &ReportConfig::default()).unwrap();
        assert!(with.remediation.is_some());

        let without =
            build_report_from_value(&doc, &ReportConfig::default().without_commands()).unwrap();
        assert!(without.remediation.is_none());
    }

    #[test]
    fn test_run_report_uses_source() {
        let source = StaticSource(r#"{"entries": [{"pgid": "4.1", "acting": [3]}]}"#);
        let report = run_report(&source, &ReportConfig::default()).unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.rows[0].id, "4.1");
        assert_eq!(report.rows[0].primary.as_deref(), Some("3"));
    }
}
