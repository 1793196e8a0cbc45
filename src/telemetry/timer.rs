//! Request timing.
//!
//! `RequestTimer::start()` → `RunningTimer::stop()` → `TimerSpan`.
//! A span cannot exist without both timestamps, so reading the elapsed time
//! of an unstopped timer is not expressible.

use std::time::{Duration, Instant};

/// Entry point for timing a request.
#[derive(Debug)]
pub struct RequestTimer;

impl RequestTimer {
    /// Record the current instant as the start of the request.
    pub fn start() -> RunningTimer {
        RunningTimer {
            start: Instant::now(),
        }
    }
}

/// A timer that has been started but not stopped.
#[derive(Debug, Clone, Copy)]
pub struct RunningTimer {
    start: Instant,
}

impl RunningTimer {
    /// Record the current instant as the end of the request.
    pub fn stop(self) -> TimerSpan {
        TimerSpan::new(self.start, Instant::now())
    }
}

/// Start and end of a timed request. `end >= start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSpan {
    start: Instant,
    end: Instant,
}

impl TimerSpan {
    pub fn new(start: Instant, end: Instant) -> Self {
        debug_assert!(end >= start, "timer stopped before it started");
        Self { start, end }
    }

    pub fn elapsed(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }

    /// Elapsed time rounded to the nearest whole millisecond.
    pub fn elapsed_millis(&self) -> u64 {
        round_millis(self.elapsed())
    }
}

/// `round(seconds * 1000)`.
pub fn round_millis(duration: Duration) -> u64 {
    (duration.as_secs_f64() * 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_millis() {
        assert_eq!(round_millis(Duration::ZERO), 0);
        assert_eq!(round_millis(Duration::from_micros(499)), 0);
        assert_eq!(round_millis(Duration::from_micros(501)), 1);
        assert_eq!(round_millis(Duration::from_micros(1_499)), 1);
        assert_eq!(round_millis(Duration::from_micros(250_600)), 251);
        assert_eq!(round_millis(Duration::from_secs(3)), 3000);
    }

    #[test]
    fn test_span_from_instants() {
        let start = Instant::now();
        let span = TimerSpan::new(start, start + Duration::from_millis(250));
        assert_eq!(span.elapsed_millis(), 250);
        assert_eq!(span.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_running_timer_measures_sleep() {
        let timer = RequestTimer::start();
        std::thread::sleep(Duration::from_millis(20));
        let span = timer.stop();
        assert!(span.elapsed_millis() >= 20);
    }

    #[test]
    fn test_zero_length_span() {
        let now = Instant::now();
        assert_eq!(TimerSpan::new(now, now).elapsed_millis(), 0);
    }
}
