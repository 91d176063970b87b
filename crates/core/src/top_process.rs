//! Selection of the single busiest process.
//!
//! Reporting only a consumer above 0% and breaking ties by table order are
//! display policy, not OS constraints.

use crate::{
    error::Result,
    metrics::MetricsProvider,
    model::{ProcessEntry, ProcessUsage},
};

/// Query the provider's process table and pick the top CPU consumer.
///
/// A failed table listing is logged and reported as `None`.
pub fn top_cpu_consumer<P: MetricsProvider + ?Sized>(
    provider: &mut P,
    max_name_len: usize,
) -> Option<ProcessUsage> {
    match provider.processes() {
        Ok(entries) => select_top(entries, max_name_len),
        Err(e) => {
            log::warn!("Process table unavailable: {}", e);
            None
        }
    }
}

/// Highest CPU user among readable entries.
///
/// Unreadable entries are skipped. Ties go to the first entry seen. Returns
/// `None` for an empty table or when nothing uses more than 0%.
pub fn select_top<I>(entries: I, max_name_len: usize) -> Option<ProcessUsage>
where
    I: IntoIterator<Item = Result<ProcessEntry>>,
{
    let mut best: Option<ProcessEntry> = None;
    let mut skipped = 0usize;

    for entry in entries {
        let entry = match entry {
            Ok(entry) if entry.cpu_percent.is_finite() => entry,
            Ok(_) | Err(_) => {
                skipped += 1;
                continue;
            }
        };

        let better = match &best {
            Some(current) => entry.cpu_percent > current.cpu_percent,
            None => true,
        };
        if better {
            best = Some(entry);
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {} unreadable processes", skipped);
    }

    best.filter(|entry| entry.cpu_percent > 0.0)
        .map(|entry| ProcessUsage {
            pid: entry.pid,
            name: truncate_name(&entry.name, max_name_len),
            cpu_percent: entry.cpu_percent,
        })
}

/// First `max_chars` characters of `name`
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    name.chars().take(max_chars).collect()
}
