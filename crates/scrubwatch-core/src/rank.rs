//! Staleness ranking.

use std::cmp::Ordering;

use crate::error::{Result, ScrubError};
use crate::project::NormalizedRow;

/// Oldest scrub first; ties broken by raw stamp text, then by PG id.
///
/// Two rows compare equal only when all three keys are equal, so the order
/// never depends on input position for distinct PGs.
pub fn staleness_order(a: &NormalizedRow, b: &NormalizedRow) -> Ordering {
    a.instant
        .cmp(&b.instant)
        .then_with(|| a.raw_timestamp.cmp(&b.raw_timestamp))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort `rows` by staleness and keep the first `count`.
///
/// `count` larger than the row set is clamped, not rejected.
pub fn rank(mut rows: Vec<NormalizedRow>, count: usize) -> Result<Vec<NormalizedRow>> {
    if rows.is_empty() {
        return Err(ScrubError::NoRankableRows);
    }

    rows.sort_by(staleness_order);
    rows.truncate(count.min(rows.len()));
    Ok(rows)
}
