use thiserror::Error;

/// Core errors for the metrics engine
#[derive(Error, Debug)]
pub enum CoreError {
    /// The metric cannot be read on this host or at this permission level.
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// A single poll failed; the next tick may succeed.
    #[error("Transient read error: {0}")]
    TransientRead(String),

    /// The wall clock did not advance between two samples.
    #[error("Clock anomaly: {0}")]
    ClockAnomaly(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform-specific error: {0}")]
    Platform(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn sensor_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::SensorUnavailable(msg.into())
    }

    pub fn transient<S: Into<String>>(msg: S) -> Self {
        Self::TransientRead(msg.into())
    }

    pub fn clock_anomaly<S: Into<String>>(msg: S) -> Self {
        Self::ClockAnomaly(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn platform<S: Into<String>>(msg: S) -> Self {
        Self::Platform(msg.into())
    }

    /// Whether this error only affects the current tick.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::SensorUnavailable(_) | Self::Config(_))
    }
}

impl From<battery::Error> for CoreError {
    fn from(err: battery::Error) -> Self {
        Self::SensorUnavailable(format!("battery: {}", err))
    }
}
