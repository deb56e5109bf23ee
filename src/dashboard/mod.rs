//! Dashboard aggregation logic.
//!
//! Pure, synchronous transformations over already-fetched application and
//! interview lists. No I/O, no shared state; callers pass an explicit `now`
//! where time matters, so identical inputs always produce identical output.

mod stats;
mod timeline;

pub use stats::*;
pub use timeline::*;

use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp. Malformed values yield None and are treated
/// as outside every window rather than as errors.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
