pub mod linux;
pub mod macos;
pub mod windows;

use crate::error::{CoreError, Result};
use std::{
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use sysinfo::System;

/// Platform-specific functionality trait
pub trait PlatformProvider: Send {
    /// Get platform name
    fn platform_name(&self) -> &'static str;

    /// Filesystem sampled for disk usage when the config names none
    fn default_disk_path(&self) -> PathBuf {
        PathBuf::from("/")
    }

    /// Boot time of the host
    fn boot_time(&self) -> Result<SystemTime> {
        boot_time_from_secs(System::boot_time())
    }
}

pub(crate) fn boot_time_from_secs(secs: u64) -> Result<SystemTime> {
    if secs == 0 {
        return Err(CoreError::sensor_unavailable("boot time not reported"));
    }
    Ok(UNIX_EPOCH + Duration::from_secs(secs))
}

/// Get the appropriate platform provider for the current system
pub fn get_platform_provider() -> Box<dyn PlatformProvider> {
    #[cfg(target_os = "linux")]
    {
        Box::new(linux::LinuxProvider::new())
    }

    #[cfg(target_os = "macos")]
    {
        Box::new(macos::MacosProvider::new())
    }

    #[cfg(target_os = "windows")]
    {
        Box::new(windows::WindowsProvider::new())
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        Box::new(GenericProvider::new())
    }
}

/// Generic provider for unsupported platforms
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub struct GenericProvider;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
impl GenericProvider {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
impl PlatformProvider for GenericProvider {
    fn platform_name(&self) -> &'static str {
        "generic"
    }
}
