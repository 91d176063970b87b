use crate::{
    error::{CoreError, Result},
    model::ProcessEntry,
};
use sysinfo::{Pid, Process, ProcessStatus, System};

/// Process table reader.
///
/// Per-process CPU usage is the delta between two refreshes, so the first
/// table after construction reports 0% for every process.
pub struct ProcessCollector {
    sys: System,
    /// Set when `count` refreshed the table and `table` has not consumed it yet
    fresh: bool,
}

impl ProcessCollector {
    pub fn new() -> Result<Self> {
        let mut sys = System::new();
        sys.refresh_processes();

        Ok(Self { sys, fresh: false })
    }

    pub fn count(&mut self) -> Result<usize> {
        self.sys.refresh_processes();
        self.fresh = true;

        match self.sys.processes().len() {
            0 => Err(CoreError::transient("process table is empty")),
            n => Ok(n),
        }
    }

    /// One entry per process in PID order.
    ///
    /// Reuses the refresh done by `count` in the same tick; refreshing twice
    /// back to back would measure CPU over a near-zero window.
    pub fn table(&mut self) -> Result<Vec<Result<ProcessEntry>>> {
        if !self.fresh {
            self.sys.refresh_processes();
        }
        self.fresh = false;

        let mut rows: Vec<(&Pid, &Process)> = self.sys.processes().iter().collect();
        rows.sort_unstable_by_key(|(pid, _)| **pid);

        Ok(rows
            .into_iter()
            .map(|(pid, process)| process_to_entry(*pid, process))
            .collect())
    }
}

fn process_to_entry(pid: Pid, process: &Process) -> Result<ProcessEntry> {
    match process.status() {
        ProcessStatus::Zombie | ProcessStatus::Dead => {
            return Err(CoreError::transient(format!("process {} has exited", pid)));
        }
        _ => {}
    }

    let cpu_percent = process.cpu_usage();
    if !cpu_percent.is_finite() {
        return Err(CoreError::transient(format!(
            "process {} reported CPU usage {}",
            pid, cpu_percent
        )));
    }

    Ok(ProcessEntry {
        pid: pid.as_u32(),
        name: process.name().to_string(),
        cpu_percent,
    })
}
