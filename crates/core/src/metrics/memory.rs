use crate::{
    error::{CoreError, Result},
    model::{MemoryUsage, SwapUsage},
};
use sysinfo::System;

pub struct MemoryCollector {
    sys: System,
}

impl MemoryCollector {
    pub fn new() -> Result<Self> {
        let sys = System::new();

        Ok(Self { sys })
    }

    pub fn virtual_memory(&mut self) -> Result<MemoryUsage> {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        if total == 0 {
            return Err(CoreError::sensor_unavailable("total memory reported as 0"));
        }
        let used = self.sys.used_memory().min(total);

        Ok(MemoryUsage {
            total,
            used,
            percent: percent_of(used, total),
        })
    }

    /// Swap is refreshed together with memory; a host without swap reports 0%.
    pub fn swap(&mut self) -> Result<SwapUsage> {
        self.sys.refresh_memory();

        let total = self.sys.total_swap();
        let used = self.sys.used_swap().min(total);

        Ok(SwapUsage {
            total,
            used,
            percent: percent_of(used, total),
        })
    }
}

pub(crate) fn percent_of(part: u64, whole: u64) -> f32 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0) as f32
}
