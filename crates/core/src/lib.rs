pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod history;
pub mod metrics;
pub mod model;
pub mod platform;
pub mod rate;
pub mod reader;
pub mod sampler;
pub mod top_process;

pub use config::Config;
pub use engine::SnapshotAssembler;
pub use error::{CoreError, Result};
pub use history::HistoryBuffer;
pub use metrics::{MetricsProvider, SysinfoProvider};
pub use model::*;
pub use platform::PlatformProvider;
pub use rate::rate;
pub use reader::CounterReader;
pub use sampler::{Sampler, SnapshotReader};
pub use top_process::top_cpu_consumer;
