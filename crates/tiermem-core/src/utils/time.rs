//! Time Utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format datetime as RFC 3339 string
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Milliseconds since the Unix epoch, as used by recency scoring
pub fn timestamp_millis(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_utc() {
        let now = now_utc();
        assert!(now.timestamp() > 0);
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_datetime(&dt), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_timestamp_millis_orders_by_time() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 1).unwrap();
        assert_eq!(timestamp_millis(&later) - timestamp_millis(&earlier), 1000.0);
    }
}
