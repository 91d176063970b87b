use crate::{
    engine::SnapshotAssembler,
    error::Result,
    metrics::MetricsProvider,
    model::MetricsSnapshot,
};
use parking_lot::RwLock;
use std::{
    sync::{
        mpsc::{self, RecvTimeoutError},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

type Slot = Arc<RwLock<Option<Arc<MetricsSnapshot>>>>;

/// Read side of a running [`Sampler`]; cheap to clone across threads.
#[derive(Clone)]
pub struct SnapshotReader {
    slot: Slot,
}

impl SnapshotReader {
    /// Most recent complete snapshot, if any tick has finished yet
    pub fn latest(&self) -> Option<Arc<MetricsSnapshot>> {
        self.slot.read().clone()
    }
}

/// Runs a [`SnapshotAssembler`] on a background thread at a fixed interval.
///
/// Each finished snapshot replaces the published one with a single pointer
/// swap, so readers see either the old or the new snapshot and never one
/// under construction. A tick that overruns the interval is followed
/// immediately by the next; ticks never overlap.
pub struct Sampler {
    slot: Slot,
    shutdown: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Sampler {
    pub fn spawn<P>(mut engine: SnapshotAssembler<P>, interval: Duration) -> Result<Self>
    where
        P: MetricsProvider + Send + 'static,
    {
        let slot: Slot = Arc::new(RwLock::new(None));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let publish = Arc::clone(&slot);
        let handle = thread::Builder::new()
            .name("arcmon-sampler".to_string())
            .spawn(move || {
                log::debug!("Sampler thread started, interval {:?}", interval);
                loop {
                    let started = Instant::now();
                    let snapshot = Arc::new(engine.tick());
                    *publish.write() = Some(snapshot);

                    let wait = interval.saturating_sub(started.elapsed());
                    match shutdown_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::debug!("Sampler thread stopped");
            })?;

        Ok(Self {
            slot,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn latest(&self) -> Option<Arc<MetricsSnapshot>> {
        self.slot.read().clone()
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Signal the thread and wait for the in-flight tick to finish
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Sampler thread panicked");
            }
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, metrics::fake::FakeProvider};
    use std::path::PathBuf;

    fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    fn spawn_fake(interval: Duration) -> Sampler {
        let engine = SnapshotAssembler::new(
            FakeProvider::healthy(),
            &Config::default(),
            PathBuf::from("/"),
        );
        Sampler::spawn(engine, interval).unwrap()
    }

    #[test]
    fn test_publishes_snapshots() {
        let sampler = spawn_fake(Duration::from_millis(10));
        let reader = sampler.reader();

        assert!(wait_for(|| reader
            .latest()
            .map_or(false, |snapshot| snapshot.tick >= 2)));

        let snapshot = sampler.latest().unwrap();
        assert!(snapshot.rate.is_some());
        sampler.stop();
    }

    #[test]
    fn test_reader_outlives_sampler() {
        let sampler = spawn_fake(Duration::from_millis(10));
        let reader = sampler.reader();
        assert!(wait_for(|| reader.latest().is_some()));

        drop(sampler);
        let last = reader.latest().unwrap();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(reader.latest().unwrap().tick, last.tick);
    }

    #[test]
    fn test_stop_interrupts_long_wait() {
        let sampler = spawn_fake(Duration::from_secs(10));
        let reader = sampler.reader();
        assert!(wait_for(|| reader.latest().is_some()));

        let started = Instant::now();
        sampler.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
