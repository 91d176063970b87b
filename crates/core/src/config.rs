use crate::{
    error::{CoreError, Result},
    metrics::CpuCollector,
    platform::PlatformProvider,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

const MIN_REFRESH_MS: u64 = 50;
const MAX_REFRESH_MS: u64 = 10_000;
const MAX_HISTORY_LEN: usize = 3_600;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tick interval in milliseconds
    pub refresh_ms: u64,

    /// Samples kept per history graph
    pub history_len: usize,

    /// CPU measurement window in milliseconds (blocks the tick)
    pub cpu_sample_ms: u64,

    /// Filesystem sampled for disk usage; platform default when unset
    pub disk_path: Option<PathBuf>,

    /// Maximum characters kept of the top process name
    pub process_name_len: usize,

    /// Count loopback traffic in network throughput
    pub include_loopback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_ms: 1000,
            history_len: 60,
            cpu_sample_ms: 100,
            disk_path: None,
            process_name_len: 10,
            include_loopback: false,
        }
    }
}

/// One configuration file layer; only the fields it names are applied
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub refresh_ms: Option<u64>,
    pub history_len: Option<usize>,
    pub cpu_sample_ms: Option<u64>,
    pub disk_path: Option<PathBuf>,
    pub process_name_len: Option<usize>,
    pub include_loopback: Option<bool>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            CoreError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }
}

impl Config {
    /// Load configuration from multiple sources in order of preference:
    /// 1. CLI arguments override everything
    /// 2. JSON config file if specified
    /// 3. Default config file locations
    /// 4. Built-in defaults
    pub fn load(cli_config: Option<&CliConfig>, json_path: Option<&Path>) -> Result<Self> {
        Self::load_with_search_paths(&Self::default_config_paths(), cli_config, json_path)
    }

    /// [`load`](Self::load) with an explicit list of default file locations
    pub fn load_with_search_paths(
        search_paths: &[PathBuf],
        cli_config: Option<&CliConfig>,
        json_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(default_file) = Self::load_default_config(search_paths) {
            config.merge(default_file);
        }

        if let Some(path) = json_path {
            config.merge(ConfigFile::read(path)?);
        }

        if let Some(cli) = cli_config {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific JSON file over the defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge(ConfigFile::read(path)?);
        Ok(config)
    }

    /// First readable file among `search_paths`
    fn load_default_config(search_paths: &[PathBuf]) -> Option<ConfigFile> {
        for path in search_paths {
            if !path.exists() {
                continue;
            }
            match ConfigFile::read(path) {
                Ok(file) => {
                    log::debug!("Loaded config from {}", path.display());
                    return Some(file);
                }
                Err(e) => {
                    log::warn!("Ignoring config at {}: {}", path.display(), e);
                }
            }
        }

        None
    }

    /// Get default configuration file search paths
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("arcmon").join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".arcmon.json"));
        }

        paths.push(PathBuf::from("arcmon.json"));

        paths
    }

    /// Apply every field the file sets
    fn merge(&mut self, file: ConfigFile) {
        if let Some(refresh) = file.refresh_ms {
            self.refresh_ms = refresh;
        }
        if let Some(history) = file.history_len {
            self.history_len = history;
        }
        if let Some(cpu) = file.cpu_sample_ms {
            self.cpu_sample_ms = cpu;
        }
        if let Some(path) = file.disk_path {
            self.disk_path = Some(path);
        }
        if let Some(len) = file.process_name_len {
            self.process_name_len = len;
        }
        if let Some(loopback) = file.include_loopback {
            self.include_loopback = loopback;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &CliConfig) {
        if let Some(refresh) = cli.refresh_ms {
            self.refresh_ms = refresh;
        }
        if let Some(history) = cli.history_len {
            self.history_len = history;
        }
        if let Some(path) = &cli.disk_path {
            self.disk_path = Some(path.clone());
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.refresh_ms < MIN_REFRESH_MS {
            return Err(CoreError::config(format!(
                "Refresh interval must be at least {}ms",
                MIN_REFRESH_MS
            )));
        }

        if self.refresh_ms > MAX_REFRESH_MS {
            return Err(CoreError::config("Refresh interval must be at most 10 seconds"));
        }

        if self.history_len == 0 || self.history_len > MAX_HISTORY_LEN {
            return Err(CoreError::config(format!(
                "History length must be between 1 and {}",
                MAX_HISTORY_LEN
            )));
        }

        let cpu_window = self.effective_cpu_interval();
        if cpu_window >= self.refresh_interval() {
            return Err(CoreError::config(format!(
                "CPU sample window ({}ms) must be shorter than the refresh interval ({}ms)",
                cpu_window.as_millis(),
                self.refresh_ms
            )));
        }

        if self.process_name_len == 0 {
            return Err(CoreError::config("Process name length must be at least 1"));
        }

        Ok(())
    }

    /// Get refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn cpu_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_ms)
    }

    /// How long each tick actually blocks on the CPU measurement
    pub fn effective_cpu_interval(&self) -> Duration {
        self.cpu_interval().max(CpuCollector::min_interval())
    }

    /// Configured disk path, or the platform's primary filesystem
    pub fn resolve_disk_path(&self, platform: &dyn PlatformProvider) -> PathBuf {
        self.disk_path
            .clone()
            .unwrap_or_else(|| platform.default_disk_path())
    }
}

/// CLI configuration (temporary struct for CLI parsing)
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub refresh_ms: Option<u64>,
    pub history_len: Option<usize>,
    pub disk_path: Option<PathBuf>,
}
