//! Timestamp helpers for chat messages and export filenames.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    to_millis(OffsetDateTime::now_utc())
}

#[must_use]
pub fn to_millis(at: OffsetDateTime) -> i64 {
    i64::try_from(at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

/// ISO-8601 UTC timestamp with fractional seconds dropped and `:` replaced
/// by `-` so it is safe inside a filename: `2026-10-14T18-51-07`.
#[must_use]
pub fn filename_stamp(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day]T[hour]-[minute]-[second]"))
        .unwrap_or_default()
}
