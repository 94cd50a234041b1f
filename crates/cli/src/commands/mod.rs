pub mod check;
pub mod convert;
pub mod inspect;
pub mod timeline;
pub mod verify;

use chrono::{DateTime, SecondsFormat};

/// Render a nanosecond timestamp as RFC 3339 (UTC).
pub(crate) fn format_ns(ns: u64) -> String {
    let secs = (ns / 1_000_000_000) as i64;
    let nanos = (ns % 1_000_000_000) as u32;
    DateTime::from_timestamp(secs, nanos)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Nanos, true)
}
