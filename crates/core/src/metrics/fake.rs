//! Scripted provider for unit tests.

use super::MetricsProvider;
use crate::{
    error::{CoreError, Result},
    model::{
        BatteryStatus, CounterSample, DiskUsage, FailureKind, HostInfo, MemoryUsage, NetCounters,
        ProcessEntry, Reading, SwapUsage,
    },
};
use std::{
    cell::RefCell,
    collections::VecDeque,
    path::Path,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Clock that advances by `step` on every read unless times are scripted
pub(crate) struct FakeClock {
    pub next: SystemTime,
    pub step: Duration,
    pub script: VecDeque<SystemTime>,
}

impl FakeClock {
    fn tick(&mut self) -> SystemTime {
        if let Some(time) = self.script.pop_front() {
            self.next = time + self.step;
            return time;
        }
        let now = self.next;
        self.next = now + self.step;
        now
    }
}

/// `None` fields fail with `SensorUnavailable`
pub(crate) struct FakeProvider {
    pub cpu: Option<f32>,
    pub cpu_intervals: Vec<Duration>,
    pub memory: Option<MemoryUsage>,
    pub swap: Option<SwapUsage>,
    pub network: Option<NetCounters>,
    pub net_script: VecDeque<NetCounters>,
    pub network_transient: bool,
    pub process_count: Option<usize>,
    pub processes: Vec<(u32, &'static str, f32)>,
    pub failing_pids: Vec<u32>,
    pub process_table_fails: bool,
    pub battery: Option<BatteryStatus>,
    pub disk_available: bool,
    pub boot_time: Option<SystemTime>,
    pub self_rss: Option<u64>,
    pub clock: RefCell<FakeClock>,
}

impl FakeProvider {
    pub fn healthy() -> Self {
        Self {
            cpu: Some(12.5),
            cpu_intervals: Vec::new(),
            memory: Some(MemoryUsage {
                total: 8 << 30,
                used: 4 << 30,
                percent: 50.0,
            }),
            swap: Some(SwapUsage {
                total: 2 << 30,
                used: 0,
                percent: 0.0,
            }),
            network: Some(NetCounters {
                bytes_sent: 0,
                bytes_recv: 0,
            }),
            net_script: VecDeque::new(),
            network_transient: false,
            process_count: Some(3),
            processes: vec![(1, "init", 0.0), (42, "compiler", 87.5), (77, "editor", 4.0)],
            failing_pids: Vec::new(),
            process_table_fails: false,
            battery: Some(BatteryStatus {
                percent: 80.0,
                plugged: Some(true),
            }),
            disk_available: true,
            boot_time: Some(UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
            self_rss: Some(32 << 20),
            clock: RefCell::new(FakeClock {
                next: UNIX_EPOCH + Duration::from_secs(1_700_000_100),
                step: Duration::from_secs(1),
                script: VecDeque::new(),
            }),
        }
    }

    pub fn script_times<I: IntoIterator<Item = SystemTime>>(&mut self, times: I) {
        self.clock.borrow_mut().script.extend(times);
    }
}

fn missing<T>(what: &str) -> Result<T> {
    Err(CoreError::sensor_unavailable(format!("{} not present", what)))
}

impl MetricsProvider for FakeProvider {
    fn cpu_percent(&mut self, interval: Duration) -> Result<f32> {
        self.cpu_intervals.push(interval);
        self.cpu.map_or_else(|| missing("cpu"), Ok)
    }

    fn virtual_memory(&mut self) -> Result<MemoryUsage> {
        self.memory.map_or_else(|| missing("memory"), Ok)
    }

    fn swap_memory(&mut self) -> Result<SwapUsage> {
        self.swap.map_or_else(|| missing("swap"), Ok)
    }

    fn net_io_counters(&mut self) -> Result<NetCounters> {
        if self.network_transient {
            return Err(CoreError::transient("interface vanished mid-read"));
        }
        if let Some(next) = self.net_script.pop_front() {
            self.network = Some(next);
        }
        self.network.map_or_else(|| missing("network"), Ok)
    }

    fn disk_usage(&mut self, path: &Path) -> Result<DiskUsage> {
        if !self.disk_available {
            return missing("disk");
        }
        Ok(DiskUsage {
            path: path.to_path_buf(),
            mount_point: path.to_path_buf(),
            total: 100 << 30,
            used: 25 << 30,
            percent: 25.0,
        })
    }

    fn boot_time(&mut self) -> Result<SystemTime> {
        self.boot_time.map_or_else(|| missing("boot time"), Ok)
    }

    fn process_count(&mut self) -> Result<usize> {
        self.process_count.map_or_else(|| missing("process count"), Ok)
    }

    fn processes(&mut self) -> Result<Vec<Result<ProcessEntry>>> {
        if self.process_table_fails {
            return Err(CoreError::transient("process table unreadable"));
        }
        Ok(self
            .processes
            .iter()
            .map(|&(pid, name, cpu_percent)| {
                if self.failing_pids.contains(&pid) {
                    Err(CoreError::transient(format!("process {} has exited", pid)))
                } else {
                    Ok(ProcessEntry {
                        pid,
                        name: name.to_string(),
                        cpu_percent,
                    })
                }
            })
            .collect())
    }

    fn sensors_battery(&mut self) -> Result<BatteryStatus> {
        self.battery.map_or_else(|| missing("battery"), Ok)
    }

    fn self_rss(&mut self) -> Result<u64> {
        self.self_rss.map_or_else(|| missing("self rss"), Ok)
    }

    fn host_info(&mut self) -> HostInfo {
        HostInfo {
            hostname: "testbox".to_string(),
            os_name: "TestOS".to_string(),
            logical_cores: 8,
            physical_cores: Some(4),
            platform: "test".to_string(),
            ..HostInfo::default()
        }
    }

    fn now(&self) -> SystemTime {
        self.clock.borrow_mut().tick()
    }
}

fn not_sampled<T>() -> Reading<T> {
    Reading::unavailable(FailureKind::SensorUnavailable, "not sampled")
}

/// A sample with every field unavailable, stamped at the epoch
pub(crate) fn empty_sample() -> CounterSample {
    CounterSample {
        captured_at: UNIX_EPOCH,
        cpu_percent: not_sampled(),
        memory: not_sampled(),
        swap: not_sampled(),
        network: not_sampled(),
        process_count: not_sampled(),
        battery: not_sampled(),
        disk: not_sampled(),
        boot_time: not_sampled(),
        self_rss: not_sampled(),
    }
}
