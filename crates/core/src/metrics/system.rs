use crate::{
    error::{CoreError, Result},
    model::HostInfo,
    platform::PlatformProvider,
};
use std::time::SystemTime;
use sysinfo::{Pid, System};

pub struct SystemCollector {
    sys: System,
    platform: Box<dyn PlatformProvider>,
    self_pid: Option<Pid>,
}

impl SystemCollector {
    pub fn new(platform: Box<dyn PlatformProvider>) -> Result<Self> {
        let sys = System::new();
        let self_pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                log::warn!("Cannot determine own PID, self memory will be unavailable: {}", e);
                None
            }
        };

        Ok(Self {
            sys,
            platform,
            self_pid,
        })
    }

    pub fn host_info(&self) -> HostInfo {
        HostInfo {
            hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            os_name: System::name().unwrap_or_else(|| "unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "unknown".to_string()),
            kernel_version: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
            arch: System::cpu_arch().unwrap_or_else(|| std::env::consts::ARCH.to_string()),
            platform: self.platform.platform_name().to_string(),
            ..HostInfo::default()
        }
    }

    pub fn boot_time(&self) -> Result<SystemTime> {
        self.platform.boot_time()
    }

    pub fn self_rss(&mut self) -> Result<u64> {
        let pid = self
            .self_pid
            .ok_or_else(|| CoreError::sensor_unavailable("own PID unknown"))?;

        if !self.sys.refresh_process(pid) {
            return Err(CoreError::transient(format!("could not refresh process {}", pid)));
        }

        self.sys
            .process(pid)
            .map(|process| process.memory())
            .ok_or_else(|| CoreError::transient(format!("process {} not in table", pid)))
    }
}
