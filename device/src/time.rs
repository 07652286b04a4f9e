//! Sleeping for whole `embassy_time` durations on a `DelayNs`.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

/// Sleeps for the whole of `duration`, split into as many `delay_ms` calls as
/// a `u32` millisecond count needs.
pub async fn sleep<D: DelayNs>(delay: &mut D, duration: Duration) {
    let mut remaining = duration.as_millis();
    while remaining > 0 {
        let chunk = remaining.min(u32::MAX as u64);
        delay.delay_ms(chunk as u32).await;
        remaining -= chunk;
    }
}
