//! Record timestamps.
//!
//! Timestamps are stored as Japan Standard Time text, `YYYY/MM/DD HH:MM:SS`.

use chrono::{DateTime, FixedOffset, Utc};

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Japan Standard Time, UTC+9 with no daylight saving.
const JST: FixedOffset = match FixedOffset::east_opt(9 * 3600) {
    Some(offset) => offset,
    None => panic!("UTC+9 is a valid offset"),
};

/// Formats an instant as a JST timestamp.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&JST).format(TIMESTAMP_FORMAT).to_string()
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
