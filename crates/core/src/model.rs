use crate::{error::CoreError, history::HistoryBuffer};
use serde::{Deserialize, Serialize};
use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, SystemTime},
};

/// Why a field could not be read this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    SensorUnavailable,
    TransientRead,
}

/// Sentinel payload for a field that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unavailable {
    pub kind: FailureKind,
    pub reason: String,
}

/// A single metric field: either a value or an explicit "unavailable" marker.
///
/// Keeping the failure as data lets a renderer tell "0%" apart from
/// "could not read" without the tick itself ever failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Reading<T> {
    Available(T),
    Unavailable(Unavailable),
}

impl<T> Reading<T> {
    pub fn unavailable<S: Into<String>>(kind: FailureKind, reason: S) -> Self {
        Self::Unavailable(Unavailable {
            kind,
            reason: reason.into(),
        })
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Unavailable> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable(failure) => Some(failure),
        }
    }
}

impl<T> From<crate::error::Result<T>> for Reading<T> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Available(value),
            Err(CoreError::SensorUnavailable(reason)) => {
                Self::unavailable(FailureKind::SensorUnavailable, reason)
            }
            Err(err) => {
                let kind = if err.is_transient() {
                    FailureKind::TransientRead
                } else {
                    FailureKind::SensorUnavailable
                };
                Self::unavailable(kind, err.to_string())
            }
        }
    }
}

/// Physical memory usage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub total: u64,
    pub used: u64,
    pub percent: f32,
}

/// Swap usage; `percent` is 0 when no swap is configured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapUsage {
    pub total: u64,
    pub used: u64,
    pub percent: f32,
}

/// Cumulative byte counters summed over the sampled interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// Usage of the filesystem holding the configured path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub path: PathBuf,
    pub mount_point: PathBuf,
    pub total: u64,
    pub used: u64,
    pub percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub percent: f32,
    /// `None` when the charger state cannot be determined
    pub plugged: Option<bool>,
}

/// Point-in-time readings from one pass over the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSample {
    pub captured_at: SystemTime,
    pub cpu_percent: Reading<f32>,
    pub memory: Reading<MemoryUsage>,
    pub swap: Reading<SwapUsage>,
    pub network: Reading<NetCounters>,
    pub process_count: Reading<usize>,
    pub battery: Reading<BatteryStatus>,
    pub disk: Reading<DiskUsage>,
    pub boot_time: Reading<SystemTime>,
    /// Resident memory of the monitor process itself
    pub self_rss: Reading<u64>,
}

/// Network throughput derived from two counter samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSample {
    pub up_bps: f64,
    pub down_bps: f64,
    pub interval: Duration,
}

/// Top CPU consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessUsage {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
}

/// One row of the process table as returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
}

/// Static host facts, captured once
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    pub hostname: String,
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub arch: String,
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub cpu_brand: String,
    pub cpu_frequency_mhz: u64,
    pub platform: String,
}

/// Everything a renderer needs for one frame.
///
/// Built once per tick and never mutated afterwards; the next tick
/// produces a new snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub tick: u64,
    pub captured_at: SystemTime,
    pub sample: CounterSample,
    pub rate: Option<RateSample>,
    pub cpu_history: HistoryBuffer<f32>,
    pub memory_history: HistoryBuffer<f32>,
    pub upload_history: HistoryBuffer<f64>,
    pub download_history: HistoryBuffer<f64>,
    pub top_process: Option<ProcessUsage>,
    pub host: Arc<HostInfo>,
}
