//! Timer utilities
//!
//! Provides the run timer and elapsed-time formatting.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Wall-clock start of a run
#[derive(Clone, Copy, Debug)]
pub struct RunTimer {
    started_at: DateTime<Utc>,
    start: Instant,
}

impl RunTimer {
    /// Create and start a new timer
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }

    /// Restart from now
    pub fn reset(&mut self) {
        *self = Self::start();
    }

    /// Timestamp the run started at
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for RunTimer {
    fn default() -> Self {
        Self::start()
    }
}

/// Format a duration as `HH:MM:SS`
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_timer_elapsed() {
        let timer = RunTimer::start();
        sleep(Duration::from_millis(10));
        assert!(timer.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_timer_reset() {
        let mut timer = RunTimer::start();
        let first = timer.started_at();
        sleep(Duration::from_millis(5));
        timer.reset();
        assert!(timer.started_at() >= first);
        assert!(timer.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(Duration::ZERO), "00:00:00");
        assert_eq!(format_hms(Duration::from_secs(59)), "00:00:59");
        assert_eq!(format_hms(Duration::from_secs(3 * 3600 + 25 * 60 + 7)), "03:25:07");
        assert_eq!(format_hms(Duration::from_millis(1999)), "00:00:01");
    }
}
