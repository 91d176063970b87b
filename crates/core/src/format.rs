//! Human-readable renderings of snapshot values for display layers.

use crate::model::Reading;
use std::time::Duration;

/// Text shown in place of an unavailable reading
pub const UNAVAILABLE: &str = "N/A";

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format a throughput in bytes per second
pub fn format_rate(bytes_per_sec: f64) -> String {
    let bytes_per_sec = bytes_per_sec.max(0.0);
    if bytes_per_sec < 1024.0 {
        format!("{:.0} B/s", bytes_per_sec)
    } else if bytes_per_sec < 1024.0 * 1024.0 {
        format!("{:.1} KB/s", bytes_per_sec / 1024.0)
    } else {
        format!("{:.1} MB/s", bytes_per_sec / (1024.0 * 1024.0))
    }
}

/// `3d 04:05:06` style uptime
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Render a reading with `f`, or [`UNAVAILABLE`]
pub fn format_reading<T, F>(reading: &Reading<T>, f: F) -> String
where
    F: FnOnce(&T) -> String,
{
    reading.value().map_or_else(|| UNAVAILABLE.to_string(), f)
}
