use super::PlatformProvider;
use crate::error::Result;
use std::time::SystemTime;

pub struct LinuxProvider;

impl LinuxProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinuxProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformProvider for LinuxProvider {
    fn platform_name(&self) -> &'static str {
        "linux"
    }

    fn boot_time(&self) -> Result<SystemTime> {
        #[cfg(feature = "linux_procfs")]
        {
            self.boot_time_procfs()
        }

        #[cfg(not(feature = "linux_procfs"))]
        {
            super::boot_time_from_secs(sysinfo::System::boot_time())
        }
    }
}

#[cfg(feature = "linux_procfs")]
impl LinuxProvider {
    /// `btime` from /proc/stat
    fn boot_time_procfs(&self) -> Result<SystemTime> {
        let secs = procfs::boot_time_secs().map_err(|e| {
            crate::error::CoreError::platform(format!("Failed to read /proc/stat: {}", e))
        })?;
        super::boot_time_from_secs(secs)
    }
}
