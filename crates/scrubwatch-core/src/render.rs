//! Text and JSON rendering of a [`ScrubReport`].

use crate::error::{Result, ScrubError};
use crate::pipeline::ScrubReport;
use crate::project::NormalizedRow;

const MISSING: &str = "-";

fn table_line(pg: &str, primary: &str, acting: &str, stamp: &str) -> String {
    format!("{:<12} {:<8} {:<24} {}", pg, primary, acting, stamp)
        .trim_end()
        .to_string()
}

/// Fixed-column table, header line first. Remediation lines are not included.
pub fn render_table(report: &ScrubReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Top {} of {} placement groups by oldest deep scrub:\n",
        report.rows.len(),
        report.total
    ));
    out.push_str(&table_line("PG", "PRIMARY", "ACTING", "LAST_DEEP_SCRUB"));
    out.push('\n');

    for row in &report.rows {
        let id = if row.id.is_empty() { MISSING } else { row.id.as_str() };
        let primary = row.primary.as_deref().unwrap_or(MISSING);
        let acting = if row.replicas.is_empty() {
            MISSING.to_string()
        } else {
            row.replica_list()
        };
        out.push_str(&table_line(id, primary, &acting, &row.raw_timestamp));
        out.push('\n');
    }
    out
}

/// Remediation command block, empty when the report carries none.
pub fn render_commands(report: &ScrubReport) -> String {
    let Some(plan) = &report.remediation else {
        return String::new();
    };

    let mut out = String::new();
    for line in plan.render_lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// One diagnostic line per row with its resolved instant.
pub fn debug_lines(rows: &[NormalizedRow]) -> Vec<String> {
    rows.iter()
        .map(|row| format!("debug: pg={} instant={}", row.id, row.instant))
        .collect()
}

/// Pretty JSON form of the whole report.
pub fn render_json(report: &ScrubReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| ScrubError::Render(e.to_string()))
}
