use crate::{
    error::{CoreError, Result},
    model::BatteryStatus,
};
use ::battery::{units::ratio::percent, Manager, State};

/// Reads the first battery reported by the OS.
///
/// A host with no battery (desktop, VM) reports `SensorUnavailable` every
/// tick; that is the normal state there, not an error worth retrying.
/// The `battery` manager is `!Send`, so a fresh one is opened per read to
/// keep the provider movable onto a sampler thread.
#[derive(Debug, Default)]
pub struct BatteryCollector;

impl BatteryCollector {
    pub fn new() -> Self {
        Self
    }

    pub fn status(&mut self) -> Result<BatteryStatus> {
        let manager = Manager::new()?;

        let battery = match manager.batteries()?.next() {
            Some(battery) => battery?,
            None => return Err(CoreError::sensor_unavailable("no battery present")),
        };

        Ok(BatteryStatus {
            percent: battery.state_of_charge().get::<percent>(),
            plugged: plugged_from_state(battery.state()),
        })
    }
}

fn plugged_from_state(state: State) -> Option<bool> {
    match state {
        State::Charging | State::Full => Some(true),
        State::Discharging | State::Empty => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugged_from_state() {
        assert_eq!(plugged_from_state(State::Charging), Some(true));
        assert_eq!(plugged_from_state(State::Full), Some(true));
        assert_eq!(plugged_from_state(State::Discharging), Some(false));
        assert_eq!(plugged_from_state(State::Empty), Some(false));
        assert_eq!(plugged_from_state(State::Unknown), None);
    }
}
