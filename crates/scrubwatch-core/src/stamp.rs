//! Deep-scrub timestamp normalization.
//!
//! Ceph has printed `last_deep_scrub_stamp` in several shapes over the years:
//! `2025-07-14 03:12:45.123456` (no zone), `2025-07-14T03:12:45.123456+0000`
//! (compact offset) and plain RFC 3339. [`parse_stamp`] rewrites all of them
//! into RFC 3339 and reports an explicit [`StampOutcome`];
//! [`normalize_stamp`] collapses that outcome to epoch seconds where `0`
//! means "never scrubbed or unknown".

use chrono::DateTime;
use regex::Regex;
use std::sync::OnceLock;

/// Text Ceph reports for a stamp that was never set.
pub const UNSET_STAMP: &str = "0.000000";

/// Epoch value for "never scrubbed / unknown". Always ranks oldest.
pub const NEVER_INSTANT: i64 = 0;

/// Result of parsing a single stamp, before it is collapsed to an instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampOutcome {
    /// Whole seconds since the UTC epoch.
    Parsed(i64),
    /// Absent, empty, or the unset sentinel.
    Unset,
    /// Present but not a date we understand.
    Unparsed { input: String, reason: String },
}

impl StampOutcome {
    /// Collapse to epoch seconds; anything but `Parsed` becomes [`NEVER_INSTANT`].
    pub fn epoch_seconds(&self) -> i64 {
        match self {
            StampOutcome::Parsed(secs) => *secs,
            StampOutcome::Unset | StampOutcome::Unparsed { .. } => NEVER_INSTANT,
        }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, StampOutcome::Unparsed { .. })
    }
}

fn compact_offset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([+-]\d{2})(\d{2})$").expect("compact offset pattern"))
}

fn zone_designator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:[Zz]|[+-]\d{2}:\d{2})$").expect("zone designator pattern"))
}

/// Rewrite a loosely formatted stamp into RFC 3339 text.
///
/// 1. the first space becomes `T`
/// 2. a trailing `+HHMM` becomes `+HH:MM`
/// 3. `Z` is appended when no zone is present
pub fn canonicalize(raw: &str) -> String {
    let with_t = raw.trim().replacen(' ', "T", 1);
    let with_colon = compact_offset()
        .replace(&with_t, "${1}:${2}")
        .into_owned();

    if zone_designator().is_match(&with_colon) {
        with_colon
    } else {
        format!("{with_colon}Z")
    }
}

/// Parse a stamp into an explicit outcome. Never panics.
pub fn parse_stamp(raw: &str) -> StampOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == UNSET_STAMP {
        return StampOutcome::Unset;
    }

    let canonical = canonicalize(trimmed);
    match DateTime::parse_from_rfc3339(&canonical) {
        Ok(dt) => StampOutcome::Parsed(dt.timestamp()),
        Err(e) => StampOutcome::Unparsed {
            input: raw.to_string(),
            reason: format!("{e} (normalized to {canonical:?})"),
        },
    }
}

/// Epoch seconds for an optional stamp; [`NEVER_INSTANT`] for absent,
/// unset, or unparsable input.
pub fn normalize_stamp(raw: Option<&str>) -> i64 {
    raw.map(parse_stamp)
        .map(|outcome| outcome.epoch_seconds())
        .unwrap_or(NEVER_INSTANT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalent_forms_share_an_instant() {
        let legacy = normalize_stamp(Some("2025-07-14 03:12:45.123456"));
        let zulu = normalize_stamp(Some("2025-07-14T03:12:45.123456Z"));
        let compact = normalize_stamp(Some("2025-07-14T03:12:45.123456+0000"));

        assert_eq!(legacy, 1_752_462_765);
        assert_eq!(legacy, zulu);
        assert_eq!(legacy, compact);
    }

    #[test]
    fn test_unset_sentinel_and_empty_are_never() {
        assert_eq!(normalize_stamp(Some(UNSET_STAMP)), NEVER_INSTANT);
        assert_eq!(normalize_stamp(Some("")), NEVER_INSTANT);
        assert_eq!(normalize_stamp(Some("   ")), NEVER_INSTANT);
        assert_eq!(normalize_stamp(None), NEVER_INSTANT);
        assert_eq!(parse_stamp(UNSET_STAMP), StampOutcome::Unset);
    }

    #[test]
    fn test_garbage_is_unparsed_not_a_panic() {
        let outcome = parse_stamp("not-a-date");
        assert!(outcome.is_unparsed());
        assert_eq!(outcome.epoch_seconds(), NEVER_INSTANT);
        assert_eq!(normalize_stamp(Some("not-a-date")), NEVER_INSTANT);
    }

    #[test]
    fn test_out_of_range_components_are_unparsed() {
        assert!(parse_stamp("2025-13-40 25:61:61").is_unparsed());
        assert!(parse_stamp("2025-07-14").is_unparsed());
    }

    #[test]
    fn test_non_utc_offset_is_applied() {
        assert_eq!(
            normalize_stamp(Some("2025-07-14T03:12:45+0530")),
            1_752_442_965
        );
        assert_eq!(
            normalize_stamp(Some("2025-07-14T03:12:45+05:30")),
            1_752_442_965
        );
    }

    #[test]
    fn test_long_fraction_is_truncated() {
        let nanos = normalize_stamp(Some("2025-07-14 03:12:45.999999999999"));
        assert_eq!(nanos, 1_752_462_765);
    }

    #[test]
    fn test_canonicalize_rules() {
        assert_eq!(
            canonicalize("2025-07-14 03:12:45.1"),
            "2025-07-14T03:12:45.1Z"
        );
        assert_eq!(
            canonicalize("2025-07-14T03:12:45-0700"),
            "2025-07-14T03:12:45-07:00"
        );
        assert_eq!(canonicalize("2025-07-14T03:12:45Z"), "2025-07-14T03:12:45Z");
    }
}
