pub mod battery;
pub mod cpu;
pub mod disk;
pub mod memory;
pub mod network;
pub mod process;
pub mod system;

#[cfg(test)]
pub(crate) mod fake;

pub use self::battery::BatteryCollector;
pub use cpu::CpuCollector;
pub use disk::DiskCollector;
pub use memory::MemoryCollector;
pub use network::NetworkCollector;
pub use process::ProcessCollector;
pub use system::SystemCollector;

use crate::{
    config::Config,
    error::Result,
    model::{BatteryStatus, DiskUsage, HostInfo, MemoryUsage, NetCounters, ProcessEntry, SwapUsage},
    platform::PlatformProvider,
};
use std::{
    path::Path,
    time::{Duration, SystemTime},
};

/// Source of raw host counters.
///
/// Every method is an independent query so one failing sensor never hides
/// the others. Implementations are polled from a single thread at a time.
pub trait MetricsProvider {
    /// Global CPU utilisation over `interval`. Blocks for that long.
    fn cpu_percent(&mut self, interval: Duration) -> Result<f32>;

    fn virtual_memory(&mut self) -> Result<MemoryUsage>;

    fn swap_memory(&mut self) -> Result<SwapUsage>;

    /// Cumulative bytes sent/received since boot
    fn net_io_counters(&mut self) -> Result<NetCounters>;

    fn disk_usage(&mut self, path: &Path) -> Result<DiskUsage>;

    fn boot_time(&mut self) -> Result<SystemTime>;

    fn process_count(&mut self) -> Result<usize>;

    /// Live process table, one result per process, in PID order.
    ///
    /// The outer error means the table itself could not be listed.
    fn processes(&mut self) -> Result<Vec<Result<ProcessEntry>>>;

    fn sensors_battery(&mut self) -> Result<BatteryStatus>;

    /// Resident memory of the current process in bytes
    fn self_rss(&mut self) -> Result<u64>;

    fn host_info(&mut self) -> HostInfo;

    /// Wall clock used to timestamp samples
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Default provider backed by `sysinfo` and the `battery` crate
pub struct SysinfoProvider {
    system: SystemCollector,
    cpu: CpuCollector,
    memory: MemoryCollector,
    disk: DiskCollector,
    network: NetworkCollector,
    process: ProcessCollector,
    battery: BatteryCollector,
}

impl SysinfoProvider {
    pub fn with_platform(config: &Config, platform: Box<dyn PlatformProvider>) -> Result<Self> {
        Ok(Self {
            system: SystemCollector::new(platform)?,
            cpu: CpuCollector::new()?,
            memory: MemoryCollector::new()?,
            disk: DiskCollector::new()?,
            network: NetworkCollector::new(config.include_loopback)?,
            process: ProcessCollector::new()?,
            battery: BatteryCollector::new(),
        })
    }
}

impl MetricsProvider for SysinfoProvider {
    fn cpu_percent(&mut self, interval: Duration) -> Result<f32> {
        self.cpu.usage(interval)
    }

    fn virtual_memory(&mut self) -> Result<MemoryUsage> {
        self.memory.virtual_memory()
    }

    fn swap_memory(&mut self) -> Result<SwapUsage> {
        self.memory.swap()
    }

    fn net_io_counters(&mut self) -> Result<NetCounters> {
        self.network.counters()
    }

    fn disk_usage(&mut self, path: &Path) -> Result<DiskUsage> {
        self.disk.usage(path)
    }

    fn boot_time(&mut self) -> Result<SystemTime> {
        self.system.boot_time()
    }

    fn process_count(&mut self) -> Result<usize> {
        self.process.count()
    }

    fn processes(&mut self) -> Result<Vec<Result<ProcessEntry>>> {
        self.process.table()
    }

    fn sensors_battery(&mut self) -> Result<BatteryStatus> {
        self.battery.status()
    }

    fn self_rss(&mut self) -> Result<u64> {
        self.system.self_rss()
    }

    fn host_info(&mut self) -> HostInfo {
        let mut host = self.system.host_info();
        self.cpu.fill_host_info(&mut host);
        host
    }
}
