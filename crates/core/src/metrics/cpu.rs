use crate::{
    error::{CoreError, Result},
    model::HostInfo,
};
use std::{thread, time::Duration};
use sysinfo::System;

pub struct CpuCollector {
    sys: System,
}

impl CpuCollector {
    pub fn new() -> Result<Self> {
        let mut sys = System::new();
        sys.refresh_cpu();

        Ok(Self { sys })
    }

    /// Shortest measurement window sysinfo can produce a meaningful value for
    pub fn min_interval() -> Duration {
        sysinfo::MINIMUM_CPU_UPDATE_INTERVAL
    }

    /// Global CPU usage measured over `interval`.
    ///
    /// Takes a baseline, sleeps, and refreshes again so even the first call
    /// returns a real value. The calling thread is blocked for the whole
    /// window.
    pub fn usage(&mut self, interval: Duration) -> Result<f32> {
        self.sys.refresh_cpu();
        if self.sys.cpus().is_empty() {
            return Err(CoreError::sensor_unavailable("no CPUs reported"));
        }

        thread::sleep(interval.max(Self::min_interval()));
        self.sys.refresh_cpu();

        let usage = self.sys.global_cpu_info().cpu_usage();
        if !usage.is_finite() {
            return Err(CoreError::transient(format!("CPU usage read as {}", usage)));
        }

        Ok(usage.clamp(0.0, 100.0))
    }

    pub fn fill_host_info(&self, host: &mut HostInfo) {
        host.logical_cores = self.sys.cpus().len();
        host.physical_cores = self.sys.physical_core_count();

        if let Some(cpu) = self.sys.cpus().first() {
            host.cpu_brand = cpu.brand().trim().to_string();
            host.cpu_frequency_mhz = cpu.frequency();
        }
    }
}
