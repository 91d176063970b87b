use super::PlatformProvider;

pub struct MacosProvider;

impl MacosProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformProvider for MacosProvider {
    fn platform_name(&self) -> &'static str {
        "macos"
    }
}
