//! Human readable renderers for plugin output.
//!
//! All of them take an `f64` so they can be handed to
//! [`LevelsOptions::render`](crate::core::levels::LevelsOptions::render).

use chrono::{DateTime, Local};
use humansize::{format_size, BINARY};

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// `42.00%`, with tiny non-zero values shown as `<0.01%`
pub fn percent(value: f64) -> String {
    if value > 0.0 && value < 0.01 {
        "<0.01%".to_string()
    } else {
        format!("{:.2}%", value)
    }
}

/// Bytes with binary prefixes, e.g. `1.50 KiB`
pub fn bytes(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let options = BINARY.decimal_places(2).decimal_zeroes(2);
    let formatted = format_size(value.abs().round() as u64, options);
    format!("{}{}", sign, formatted)
}

/// File sizes stay exact below 4 MiB and switch to MB/GB above
pub fn filesize(size: f64) -> String {
    if size < 4.0 * MIB {
        format!("{} B", size as i64)
    } else if size < 4.0 * GIB {
        format!("{:.2} MB", size / MIB)
    } else {
        format!("{:.2} GB", size / GIB)
    }
}

/// Durations in seconds, e.g. `3 min`, `5 hours 10 min`, `2 days`
pub fn age(seconds: f64) -> String {
    if seconds < 0.0 {
        return format!("-{}", age(-seconds));
    }
    if seconds < 240.0 {
        return format!("{} sec", seconds as i64);
    }

    let mins = (seconds / 60.0) as i64;
    if mins < 120 {
        return format!("{} min", mins);
    }

    let (hours, mins) = (mins / 60, mins % 60);
    if hours < 12 && mins > 0 {
        return format!("{} hours {} min", hours, mins);
    }
    if hours < 48 {
        return format!("{} hours", hours);
    }

    let (days, hours) = (hours / 24, hours % 24);
    if days < 7 && hours > 0 {
        return format!("{} days {} hours", days, hours);
    }
    format!("{} days", days)
}

/// Local time as `YYYY-MM-DD HH:MM:SS`; zero means `never`
pub fn timestamp(epoch_seconds: f64) -> String {
    if epoch_seconds == 0.0 {
        return "never".to_string();
    }

    match DateTime::from_timestamp(epoch_seconds.trunc() as i64, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "never".to_string(),
    }
}

/// `in 5 min` for future timestamps, `5 min ago` for past ones
pub fn relative_date(epoch_seconds: f64) -> String {
    relative_date_at(epoch_seconds, now())
}

pub fn relative_date_at(epoch_seconds: f64, now: f64) -> String {
    if epoch_seconds > now {
        format!("in {}", age(epoch_seconds - now))
    } else {
        format!("{} ago", age(now - epoch_seconds))
    }
}

/// Interface speeds in bit/s
pub fn nic_speed(bits_per_second: f64) -> String {
    let speed = bits_per_second;
    if speed < 1_500.0 {
        format!("{} bit/s", speed as i64)
    } else if speed < 1_000_000.0 {
        format!("{:.1} kBit/s", speed / 1_000.0)
    } else if speed < 1_000_000_000.0 {
        format!("{:.1} MBit/s", speed / 1_000_000.0)
    } else {
        format!("{:.1} GBit/s", speed / 1_000_000_000.0)
    }
}

/// Current time in seconds since the epoch
pub fn now() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}
