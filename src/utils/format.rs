//! Formatting helpers for console output.

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::telemetry::TelemetrySample;

const TIME_OF_DAY: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

/// Current time in the local offset, or UTC when the offset cannot be
/// determined (e.g. on Unix once other threads are running).
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Format a timestamp as HH:MM:SS in its own offset.
pub fn format_time_of_day(dt: &OffsetDateTime) -> String {
    dt.format(TIME_OF_DAY).unwrap_or_else(|_| dt.to_string())
}

/// One history line: time, feels-like, speed, cumulative cost.
pub fn format_sample(sample: &TelemetrySample) -> String {
    format!(
        "{}  {:>5.1} C  {:>5.0} RPM  {:>10.6}",
        format_time_of_day(&sample.timestamp),
        sample.comfort_c,
        sample.actual_rpm,
        sample.cumulative_cost
    )
}
