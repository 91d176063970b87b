use crate::{
    error::{CoreError, Result},
    model::NetCounters,
};
use sysinfo::Networks;

pub struct NetworkCollector {
    networks: Networks,
    include_loopback: bool,
}

impl NetworkCollector {
    pub fn new(include_loopback: bool) -> Result<Self> {
        let networks = Networks::new_with_refreshed_list();

        Ok(Self {
            networks,
            include_loopback,
        })
    }

    /// Cumulative totals summed over all counted interfaces.
    ///
    /// The interface list is re-read every call, so the sum can drop when an
    /// interface disappears; the rate calculator clamps that to 0.
    pub fn counters(&mut self) -> Result<NetCounters> {
        self.networks.refresh_list();
        self.networks.refresh();

        let mut counters = NetCounters {
            bytes_sent: 0,
            bytes_recv: 0,
        };
        let mut counted = 0usize;

        for (interface_name, data) in &self.networks {
            if !self.include_loopback && is_loopback(interface_name) {
                continue;
            }

            counters.bytes_sent = counters.bytes_sent.saturating_add(data.total_transmitted());
            counters.bytes_recv = counters.bytes_recv.saturating_add(data.total_received());
            counted += 1;
        }

        if counted == 0 {
            return Err(CoreError::sensor_unavailable("no network interfaces found"));
        }

        Ok(counters)
    }
}

fn is_loopback(interface_name: &str) -> bool {
    interface_name == "lo"
        || interface_name.starts_with("lo0")
        || interface_name.starts_with("Loopback")
}
