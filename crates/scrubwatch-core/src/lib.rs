//! scrubwatch core library
//!
//! Ranks Ceph placement groups by how long ago they were last deep
//! scrubbed. The pipeline is:
//!
//! - [`source`]: fetch JSON text from `ceph` or a saved file
//! - [`extract`]: find the record array in whichever shape the tool emitted
//! - [`project`]: turn each record into a [`NormalizedRow`], using [`stamp`]
//! - [`rank`](mod@rank): order by staleness and keep the top K
//! - [`remediation`] and [`render`]: commands and output text

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod project;
pub mod rank;
pub mod remediation;
pub mod render;
pub mod source;
pub mod stamp;
pub mod telemetry;

pub use config::{ReportConfig, DEFAULT_COUNT, DEFAULT_SCRUBS};
pub use error::{Result, ScrubError};
pub use extract::{extract_records, select_strategy, ExtractionStrategy, STRATEGIES};
pub use pipeline::{build_report, build_report_from_value, run_report, ScrubReport};
pub use project::{project_record, project_records, NormalizedRow, NEVER_LITERAL};
pub use rank::{rank, staleness_order};
pub use remediation::{collect_devices, RemediationPlan};
pub use render::{debug_lines, render_commands, render_json, render_table};
pub use source::{CephCommand, FileSource, RecordSource, CEPH_BIN_ENV, QUERY_FORMS};
pub use stamp::{normalize_stamp, parse_stamp, StampOutcome, NEVER_INSTANT, UNSET_STAMP};
pub use telemetry::init_tracing;

/// scrubwatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
