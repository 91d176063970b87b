use crate::{
    config::Config,
    error::{CoreError, Result},
    history::HistoryBuffer,
    metrics::{MetricsProvider, SysinfoProvider},
    model::{CounterSample, HostInfo, MetricsSnapshot, RateSample},
    platform,
    rate::try_rate,
    reader::CounterReader,
};
use std::sync::Arc;

/// Where the assembler is in its lifecycle
#[derive(Debug)]
enum EngineState {
    /// No sample taken yet, so no rate can be computed
    Uninitialized,
    /// Holds the sample the next rate is computed against: the latest one
    /// that carried network counters, if any did
    Ready { baseline: CounterSample },
}

/// The per-tick sampling engine.
///
/// Owns the rate baseline sample, the last good rate, and the four history
/// windows. Each call to [`tick`](Self::tick) produces a fresh, immutable
/// [`MetricsSnapshot`]; nothing in a tick is fatal.
pub struct SnapshotAssembler<P> {
    reader: CounterReader<P>,
    state: EngineState,
    last_rate: Option<RateSample>,
    cpu_history: HistoryBuffer<f32>,
    memory_history: HistoryBuffer<f32>,
    upload_history: HistoryBuffer<f64>,
    download_history: HistoryBuffer<f64>,
    host: Arc<HostInfo>,
    process_name_len: usize,
    ticks: u64,
}

impl SnapshotAssembler<SysinfoProvider> {
    /// Engine over the host's real counters
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let platform = platform::get_platform_provider();
        let disk_path = config.resolve_disk_path(platform.as_ref());
        let provider = SysinfoProvider::with_platform(config, platform)?;

        log::info!(
            "Sampling every {}ms, disk usage from {}",
            config.refresh_ms,
            disk_path.display()
        );
        Ok(Self::new(provider, config, disk_path))
    }
}

impl<P: MetricsProvider> SnapshotAssembler<P> {
    pub fn new(mut provider: P, config: &Config, disk_path: std::path::PathBuf) -> Self {
        let host = Arc::new(provider.host_info());
        let len = config.history_len;

        Self {
            reader: CounterReader::new(provider, config.cpu_interval(), disk_path),
            state: EngineState::Uninitialized,
            last_rate: None,
            cpu_history: HistoryBuffer::new(len, 0.0),
            memory_history: HistoryBuffer::new(len, 0.0),
            upload_history: HistoryBuffer::new(len, 0.0),
            download_history: HistoryBuffer::new(len, 0.0),
            host,
            process_name_len: config.process_name_len,
            ticks: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready { .. })
    }

    pub fn host(&self) -> &Arc<HostInfo> {
        &self.host
    }

    /// Run one sampling cycle.
    ///
    /// Blocks for the CPU measurement window. The first tick has no rate;
    /// every later tick derives one from the baseline sample.
    pub fn tick(&mut self) -> MetricsSnapshot {
        let sample = self.reader.sample();

        if let Some(cpu) = sample.cpu_percent.value() {
            self.cpu_history.push(*cpu);
        }
        if let Some(memory) = sample.memory.value() {
            self.memory_history.push(memory.percent);
        }

        let state = std::mem::replace(&mut self.state, EngineState::Uninitialized);
        let baseline = match state {
            EngineState::Uninitialized => {
                log::info!("First sample taken, throughput available from next tick");
                None
            }
            EngineState::Ready { baseline } => {
                self.update_rate(&baseline, &sample);
                Some(baseline)
            }
        };

        let top_process = self.reader.top_cpu_consumer(self.process_name_len);

        let snapshot = MetricsSnapshot {
            tick: self.ticks,
            captured_at: sample.captured_at,
            sample: sample.clone(),
            rate: self.last_rate,
            cpu_history: self.cpu_history.clone(),
            memory_history: self.memory_history.clone(),
            upload_history: self.upload_history.clone(),
            download_history: self.download_history.clone(),
            top_process,
            host: Arc::clone(&self.host),
        };

        // A tick without counters keeps the older baseline so the next good
        // tick still gets a rate
        let baseline = match baseline {
            Some(baseline)
                if !sample.network.is_available() && baseline.network.is_available() =>
            {
                baseline
            }
            _ => sample,
        };
        self.state = EngineState::Ready { baseline };
        self.ticks += 1;

        snapshot
    }

    fn update_rate(&mut self, baseline: &CounterSample, current: &CounterSample) {
        match try_rate(baseline, current) {
            Ok(rate) => {
                self.upload_history.push(rate.up_bps);
                self.download_history.push(rate.down_bps);
                self.last_rate = Some(rate);
            }
            Err(CoreError::ClockAnomaly(reason)) => {
                // last_rate stays as it was
                log::warn!("Skipping throughput update: {}", reason);
            }
            Err(e) => {
                log::debug!("No throughput this tick: {}", e);
                self.last_rate = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fake::FakeProvider;
    use crate::model::{FailureKind, NetCounters, Reading};
    use std::{
        path::PathBuf,
        time::{Duration, UNIX_EPOCH},
    };

    fn engine(provider: FakeProvider) -> SnapshotAssembler<FakeProvider> {
        SnapshotAssembler::new(provider, &Config::default(), PathBuf::from("/"))
    }

    fn counters(sent: u64, recv: u64) -> NetCounters {
        NetCounters {
            bytes_sent: sent,
            bytes_recv: recv,
        }
    }

    #[test]
    fn test_first_tick_has_no_rate() {
        let mut engine = engine(FakeProvider::healthy());
        assert!(!engine.is_ready());

        let first = engine.tick();
        assert!(first.rate.is_none());
        assert_eq!(first.tick, 0);
        assert!(engine.is_ready());

        let second = engine.tick();
        assert!(second.rate.is_some());
        assert_eq!(second.tick, 1);
    }

    #[test]
    fn test_rate_feeds_history() {
        let mut provider = FakeProvider::healthy();
        provider
            .net_script
            .extend([counters(0, 0), counters(1_000_000, 4_000)]);
        let mut engine = engine(provider);

        engine.tick();
        let snapshot = engine.tick();

        let rate = snapshot.rate.unwrap();
        assert_eq!(rate.up_bps, 1_000_000.0);
        assert_eq!(rate.down_bps, 4_000.0);
        assert_eq!(snapshot.upload_history.latest(), 1_000_000.0);
        assert_eq!(snapshot.download_history.latest(), 4_000.0);
        assert_eq!(snapshot.upload_history.capacity(), 60);
    }

    #[test]
    fn test_histories_keep_fixed_length() {
        let mut engine = engine(FakeProvider::healthy());
        let mut last = None;
        for _ in 0..75 {
            last = Some(engine.tick());
        }
        let snapshot = last.unwrap();

        assert_eq!(snapshot.cpu_history.as_sequence().len(), 60);
        assert_eq!(snapshot.memory_history.as_sequence().len(), 60);
        assert_eq!(snapshot.cpu_history.latest(), 12.5);
        assert_eq!(snapshot.memory_history.latest(), 50.0);
    }

    #[test]
    fn test_battery_failure_still_yields_snapshot() {
        let mut provider = FakeProvider::healthy();
        provider.battery = None;
        let mut engine = engine(provider);

        let snapshot = engine.tick();
        assert_eq!(snapshot.sample.cpu_percent, Reading::Available(12.5));
        assert_eq!(snapshot.sample.memory.value().unwrap().percent, 50.0);
        assert_eq!(
            snapshot.sample.battery.failure().unwrap().kind,
            FailureKind::SensorUnavailable
        );
        assert_eq!(snapshot.cpu_history.latest(), 12.5);
    }

    #[test]
    fn test_cpu_failure_only_stalls_cpu_history() {
        let mut provider = FakeProvider::healthy();
        provider.cpu = None;
        let mut engine = engine(provider);

        let snapshot = engine.tick();
        assert!(!snapshot.sample.cpu_percent.is_available());
        assert_eq!(snapshot.cpu_history.latest(), 0.0);
        assert_eq!(snapshot.memory_history.latest(), 50.0);
    }

    #[test]
    fn test_clock_anomaly_keeps_last_rate() {
        let base = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let mut provider = FakeProvider::healthy();
        provider.script_times([
            base,
            base + Duration::from_secs(1),
            base + Duration::from_secs(1),
        ]);
        provider
            .net_script
            .extend([counters(0, 0), counters(500, 500), counters(9_000, 9_000)]);
        let mut engine = engine(provider);

        engine.tick();
        let good = engine.tick();
        let skewed = engine.tick();

        assert_eq!(good.rate.unwrap().up_bps, 500.0);
        assert_eq!(skewed.rate, good.rate);
        assert_eq!(skewed.upload_history, good.upload_history);
    }

    #[test]
    fn test_missing_counters_clear_rate() {
        let mut engine = engine(FakeProvider::healthy());
        engine.tick();
        assert!(engine.tick().rate.is_some());

        engine.reader.provider_mut().network_transient = true;
        let snapshot = engine.tick();
        assert!(snapshot.rate.is_none());
        assert_eq!(
            snapshot.sample.network.failure().unwrap().kind,
            FailureKind::TransientRead
        );
    }

    #[test]
    fn test_rate_resumes_after_one_failed_read() {
        let mut provider = FakeProvider::healthy();
        provider.net_script.extend([
            counters(0, 0),
            counters(1_000, 2_000),
            counters(5_000, 10_000),
        ]);
        let mut engine = engine(provider);

        engine.tick();
        engine.tick();

        engine.reader.provider_mut().network_transient = true;
        assert!(engine.tick().rate.is_none());

        engine.reader.provider_mut().network_transient = false;
        let snapshot = engine.tick();
        let rate = snapshot.rate.unwrap();
        assert_eq!(rate.interval, Duration::from_secs(2));
        assert_eq!(rate.up_bps, 2_000.0);
        assert_eq!(rate.down_bps, 4_000.0);
        assert_eq!(snapshot.upload_history.latest(), 2_000.0);
    }

    #[test]
    fn test_top_process_in_snapshot() {
        let mut provider = FakeProvider::healthy();
        provider.failing_pids = vec![42];
        let mut engine = engine(provider);

        let top = engine.tick().top_process.unwrap();
        assert_eq!(top.name, "editor");
        assert_eq!(top.pid, 77);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut engine = engine(FakeProvider::healthy());
        engine.tick();
        let snapshot = engine.tick();

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["cpu_history"].as_array().unwrap().len(), 60);
        assert_eq!(json["sample"]["cpu_percent"]["status"], "available");
        assert_eq!(json["host"]["hostname"], "testbox");
    }
}
