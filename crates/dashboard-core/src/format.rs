//! Display formatting helpers shared by the pages

use chrono::{DateTime, Utc};

const KIB: f64 = 1024.0;

/// Format a byte count as `B`, `KB`, `MB` or `GB` with one decimal
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < KIB * KIB {
        format!("{:.1} KB", value / KIB)
    } else if value < KIB * KIB * KIB {
        format!("{:.1} MB", value / KIB / KIB)
    } else {
        format!("{:.1} GB", value / KIB / KIB / KIB)
    }
}

/// Format a duration in milliseconds (`845ms`, `2.35s`)
#[must_use]
pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}

/// Compact currency label: `$1.3M`, `$85K`, `$500`
#[must_use]
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.0}K", value / 1_000.0)
    } else {
        format!("${value}")
    }
}

/// Human relative age of `date` as seen from `now`
///
/// Whole days are counted: `Today`, `Yesterday`, `N days ago`, then weeks
/// below 30 days and months beyond.
#[must_use]
pub fn format_relative_time(now: DateTime<Utc>, date: DateTime<Utc>) -> String {
    let days = (now - date).num_days();
    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{d} days ago"),
        d if d < 30 => format!("{} weeks ago", d / 7),
        d => format!("{} months ago", d / 30),
    }
}

/// Calendar date in `Jan 5, 2024` form
#[must_use]
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Short timestamp in `Jan 5, 10:30:00` form
#[must_use]
pub fn format_timestamp(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %H:%M:%S").to_string()
}

/// ISO calendar date used in export filenames (`2024-01-05`)
#[must_use]
pub fn iso_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}
