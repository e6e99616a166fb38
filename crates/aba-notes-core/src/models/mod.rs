//! Domain models for ABA session notes.

mod bcba;
mod clinic;
mod patient;
mod session_note;

pub use bcba::*;
pub use clinic::*;
pub use patient::*;
pub use session_note::*;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Value;

/// Storage form of a calendar date (`YYYY-MM-DD`).
pub(crate) fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format("%Y-%m-%d").to_string())
}

/// Storage form of a timestamp, with offset so it reads back as UTC.
pub(crate) fn datetime_value(timestamp: DateTime<Utc>) -> Value {
    Value::Text(timestamp.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string())
}

pub(crate) fn text_value(text: &str) -> Value {
    Value::Text(text.to_string())
}
