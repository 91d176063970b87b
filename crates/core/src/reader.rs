use crate::{
    error::Result,
    metrics::MetricsProvider,
    model::{CounterSample, ProcessUsage, Reading},
    top_process,
};
use std::{collections::HashSet, path::PathBuf, time::Duration};

/// Polls a [`MetricsProvider`] into one [`CounterSample`] per call.
///
/// Each field is read independently; a failure becomes an `Unavailable`
/// reading for that field only. A field's first failure is logged at warn,
/// repeats at debug, and recovery at info.
pub struct CounterReader<P> {
    provider: P,
    cpu_interval: Duration,
    disk_path: PathBuf,
    failing: HashSet<&'static str>,
}

impl<P> CounterReader<P> {
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}

impl<P: MetricsProvider> CounterReader<P> {
    pub fn new(provider: P, cpu_interval: Duration, disk_path: PathBuf) -> Self {
        Self {
            provider,
            cpu_interval,
            disk_path,
            failing: HashSet::new(),
        }
    }

    /// Take one sample.
    ///
    /// Blocks for the CPU measurement window. `&mut self` keeps two samples
    /// from ever overlapping on the same reader.
    pub fn sample(&mut self) -> CounterSample {
        let cpu = self.provider.cpu_percent(self.cpu_interval);
        let cpu_percent = self.record("cpu", cpu);

        let memory = self.provider.virtual_memory();
        let memory = self.record("memory", memory);

        let swap = self.provider.swap_memory();
        let swap = self.record("swap", swap);

        // Timestamp sits next to the counters the rate is derived from
        let captured_at = self.provider.now();
        let network = self.provider.net_io_counters();
        let network = self.record("network", network);

        let process_count = self.provider.process_count();
        let process_count = self.record("process_count", process_count);

        let battery = self.provider.sensors_battery();
        let battery = self.record("battery", battery);

        let disk = self.provider.disk_usage(&self.disk_path);
        let disk = self.record("disk", disk);

        let boot_time = self.provider.boot_time();
        let boot_time = self.record("boot_time", boot_time);

        let self_rss = self.provider.self_rss();
        let self_rss = self.record("self_rss", self_rss);

        CounterSample {
            captured_at,
            cpu_percent,
            memory,
            swap,
            network,
            process_count,
            battery,
            disk,
            boot_time,
            self_rss,
        }
    }

    pub fn top_cpu_consumer(&mut self, max_name_len: usize) -> Option<ProcessUsage> {
        top_process::top_cpu_consumer(&mut self.provider, max_name_len)
    }

    fn record<T>(&mut self, field: &'static str, result: Result<T>) -> Reading<T> {
        match &result {
            Ok(_) => {
                if self.failing.remove(field) {
                    log::info!("{} readings recovered", field);
                }
            }
            Err(e) => {
                if self.failing.insert(field) {
                    log::warn!("{} unavailable: {}", field, e);
                } else {
                    log::debug!("{} still unavailable: {}", field, e);
                }
            }
        }
        Reading::from(result)
    }
}
