//! Shared Utilities

mod hashing;
mod time;

pub use hashing::{content_fingerprint, content_hash};
pub use time::{format_datetime, now_utc, timestamp_millis};
