use super::PlatformProvider;
use std::path::PathBuf;

pub struct WindowsProvider;

impl WindowsProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformProvider for WindowsProvider {
    fn platform_name(&self) -> &'static str {
        "windows"
    }

    /// Primary drive; `SystemDrive` covers installs not on C:
    fn default_disk_path(&self) -> PathBuf {
        match std::env::var("SystemDrive") {
            Ok(drive) if !drive.is_empty() => PathBuf::from(format!("{}\\", drive)),
            _ => PathBuf::from("C:\\"),
        }
    }
}
