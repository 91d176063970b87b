use crate::{
    error::{CoreError, Result},
    model::{CounterSample, RateSample},
};

/// Throughput between two samples, or `None` when it cannot be computed.
///
/// See [`try_rate`] for the reasons a rate is skipped.
pub fn rate(prev: &CounterSample, curr: &CounterSample) -> Option<RateSample> {
    try_rate(prev, curr).ok()
}

/// Throughput between two samples.
///
/// Fails with `ClockAnomaly` when `curr` is not strictly later than `prev`
/// and with `SensorUnavailable` when either sample lacks network counters.
/// A counter that went backwards (interface reset) yields 0, never a
/// negative rate.
pub fn try_rate(prev: &CounterSample, curr: &CounterSample) -> Result<RateSample> {
    let interval = curr
        .captured_at
        .duration_since(prev.captured_at)
        .map_err(|e| CoreError::clock_anomaly(format!("clock went back by {:?}", e.duration())))?;

    if interval.is_zero() {
        return Err(CoreError::clock_anomaly("no time elapsed between samples"));
    }

    let (prev_net, curr_net) = match (prev.network.value(), curr.network.value()) {
        (Some(prev_net), Some(curr_net)) => (prev_net, curr_net),
        _ => {
            return Err(CoreError::sensor_unavailable(
                "network counters missing from one of the samples",
            ))
        }
    };

    let secs = interval.as_secs_f64();
    let sent = curr_net.bytes_sent.saturating_sub(prev_net.bytes_sent);
    let recv = curr_net.bytes_recv.saturating_sub(prev_net.bytes_recv);

    Ok(RateSample {
        up_bps: sent as f64 / secs,
        down_bps: recv as f64 / secs,
        interval,
    })
}
