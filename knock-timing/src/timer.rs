use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic nanosecond clock behind the session controller.
///
/// All phase transitions are computed from `now_ns()` deltas against a stored
/// phase-start timestamp, so clock drift never accumulates across a session.
pub trait Timer: Clone + Send + Sync {
    /// Nanoseconds since an arbitrary fixed origin.
    fn now_ns(&self) -> u64;

    fn elapsed(&self, since_ns: u64) -> Duration {
        Duration::from_nanos(self.now_ns().saturating_sub(since_ns))
    }

    fn sleep(&self, d: Duration);
}

/// Real wall-clock timer backed by `Instant`.
#[derive(Debug, Clone)]
pub struct WallClockTimer {
    start: Instant,
}

impl WallClockTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Sub-millisecond sleep. On Linux this uses `clock_nanosleep` against
    /// CLOCK_MONOTONIC; elsewhere it falls back to `thread::sleep`.
    fn precise_sleep(&self, duration: Duration) {
        #[cfg(target_os = "linux")]
        {
            let req = libc::timespec {
                tv_sec: duration.as_secs() as libc::time_t,
                tv_nsec: duration.subsec_nanos() as libc::c_long,
            };
            unsafe {
                libc::clock_nanosleep(libc::CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
            }
        }
        #[cfg(not(target_os = "linux"))]
        std::thread::sleep(duration);
    }
}

impl Default for WallClockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for WallClockTimer {
    fn now_ns(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn sleep(&self, d: Duration) {
        self.precise_sleep(d);
    }
}

/// Manually advanced timer for deterministic tests. Clones share the same
/// underlying clock, so a test can keep one handle to advance time while the
/// controller under test holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    now: Arc<AtomicU64>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.now.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Timer for ManualTimer {
    fn now_ns(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_is_monotonic() {
        let timer = WallClockTimer::new();
        let a = timer.now_ns();
        let b = timer.now_ns();
        assert!(b >= a);
    }

    #[test]
    fn manual_timer_clones_share_the_clock() {
        let timer = ManualTimer::new();
        let handle = timer.clone();
        handle.advance_ms(250);
        assert_eq!(timer.now_ns(), 250_000_000);
        assert_eq!(timer.elapsed(0), Duration::from_millis(250));
    }

    #[test]
    fn manual_sleep_advances_time() {
        let timer = ManualTimer::new();
        timer.sleep(Duration::from_millis(5));
        assert_eq!(timer.now_ns(), 5_000_000);
    }
}
