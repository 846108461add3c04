// Wall clock and interval timers for the two targets.
use super::{Clock, Ticker};

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(target_arch = "wasm32")]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        chrono::Utc::now().timestamp_millis() as f64
    }
}

/// Ticks forever, once per interval.
#[derive(Debug, Clone, Copy)]
pub struct IntervalTicker {
    interval_ms: u32,
}

impl IntervalTicker {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
        }
    }
}

impl Ticker for IntervalTicker {
    #[cfg(target_arch = "wasm32")]
    async fn tick(&mut self) -> bool {
        gloo_timers::future::TimeoutFuture::new(self.interval_ms).await;
        true
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn tick(&mut self) -> bool {
        tokio::time::sleep(std::time::Duration::from_millis(u64::from(self.interval_ms))).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_epoch_millis() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_ms() > 1_577_836_800_000.0);
    }

    #[test]
    fn zero_interval_is_bumped() {
        assert_eq!(IntervalTicker::new(0).interval_ms, 1);
    }

    #[tokio::test]
    async fn interval_ticker_waits_one_interval() {
        let start = tokio::time::Instant::now();
        let mut ticker = IntervalTicker::new(20);
        assert!(ticker.tick().await);
        assert!(start.elapsed() >= std::time::Duration::from_millis(20));
    }
}
