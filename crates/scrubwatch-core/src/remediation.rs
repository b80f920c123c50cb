//! Copy-paste remediation commands for the stalest placement groups.
//!
//! Nothing here executes a command. The plan is rendered as shell text for
//! an operator to review and run by hand.

use serde::Serialize;
use tracing::warn;

use crate::project::{split_device_tokens, NormalizedRow};

/// Commands derived from a ranked result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemediationPlan {
    /// PG ids in rank order.
    pub pg_ids: Vec<String>,
    /// OSDs touched by those PGs, first-seen order, no duplicates.
    pub devices: Vec<String>,
    /// `osd_max_scrubs` value to set on each device.
    pub scrubs: u32,
}

/// Flatten replicas (or the primary when a row has none) into a
/// first-seen, deduplicated device list.
pub fn collect_devices(rows: &[NormalizedRow]) -> Vec<String> {
    let mut devices: Vec<String> = Vec::new();

    for row in rows {
        let sources: Vec<&str> = if row.replicas.is_empty() {
            row.primary.iter().map(String::as_str).collect()
        } else {
            row.replicas.iter().map(String::as_str).collect()
        };

        for token in sources.into_iter().flat_map(split_device_tokens) {
            if !token.chars().all(|c| c.is_ascii_digit()) {
                warn!(pgid = %row.id, device = %token, "device id is not numeric, leaving it out of the concurrency command");
                continue;
            }
            if !devices.iter().any(|seen| seen == token) {
                devices.push(token.to_string());
            }
        }
    }

    devices
}

/// Whether `id` looks like a PG id (`<pool>.<hex seed>`) and is safe to
/// paste unquoted into a shell loop.
pub fn is_shell_safe_pgid(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit() || c == '.')
}

impl RemediationPlan {
    /// Build the plan for `rows`, which must already be ranked.
    ///
    /// Rows whose id is empty or not shell safe are left out of the
    /// deep-scrub loop.
    pub fn from_ranked(rows: &[NormalizedRow], scrubs: u32) -> Self {
        let pg_ids = rows
            .iter()
            .filter(|row| {
                let safe = is_shell_safe_pgid(&row.id);
                if !safe && !row.id.is_empty() {
                    warn!(pgid = %row.id, "pgid has unexpected characters, leaving it out of the deep-scrub command");
                }
                safe
            })
            .map(|row| row.id.clone())
            .collect();

        RemediationPlan {
            pg_ids,
            devices: collect_devices(rows),
            scrubs,
        }
    }

    /// Shell loop that requests a deep scrub of every ranked PG.
    pub fn deep_scrub_command(&self) -> Option<String> {
        if self.pg_ids.is_empty() {
            return None;
        }
        Some(format!(
            "for pg in {}; do ceph pg deep-scrub \"$pg\"; done",
            self.pg_ids.join(" ")
        ))
    }

    /// Shell loop that raises `osd_max_scrubs` on every touched OSD.
    pub fn concurrency_command(&self) -> Option<String> {
        if self.devices.is_empty() {
            return None;
        }
        Some(format!(
            "for osd in {}; do ceph config set \"osd.$osd\" osd_max_scrubs {}; done",
            self.devices.join(" "),
            self.scrubs
        ))
    }

    /// Deep-scrub line first, then the concurrency line.
    pub fn render_lines(&self) -> Vec<String> {
        self.deep_scrub_command()
            .into_iter()
            .chain(self.concurrency_command())
            .collect()
    }
}
