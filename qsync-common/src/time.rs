//! Timestamp utilities

use chrono::{DateTime, TimeZone, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current unix timestamp in milliseconds, as stored under the last-sync key
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a stored millisecond timestamp back into a DateTime.
/// Returns None for unparseable or out-of-range values.
pub fn from_millis_str(value: &str) -> Option<DateTime<Utc>> {
    let millis = value.trim().parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_millis_round_trip() {
        let millis = now_millis();
        let parsed = from_millis_str(&millis.to_string()).unwrap();
        assert_eq!(parsed.timestamp_millis(), millis);
    }

    #[test]
    fn test_from_millis_str_rejects_garbage() {
        assert!(from_millis_str("not-a-number").is_none());
        assert!(from_millis_str("").is_none());
    }
}
