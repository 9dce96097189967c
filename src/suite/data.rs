//! Test data helpers

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};

static EMAIL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A fresh email address: wall-clock millis plus a per-process counter
pub fn unique_email(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = EMAIL_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}+{}-{}@example.com", prefix, millis, seq)
}

/// A `YYYY-MM-DD` date relative to today (UTC); negative values go back
pub fn travel_date(days_from_today: i64) -> String {
    (Utc::now() + Duration::days(days_from_today))
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}
