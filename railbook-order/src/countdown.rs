use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// Seconds a booking wizard shows on mount
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 300;

/// Below this the countdown is shown as urgent
pub const URGENT_BELOW_SECONDS: u32 = 60;

/// Remaining time, floored at zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn is_urgent(&self) -> bool {
        self.remaining < URGENT_BELOW_SECONDS
    }

    /// `m:ss`
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    pub fn view(&self) -> CountdownView {
        CountdownView {
            remaining_seconds: self.remaining,
            display: self.display(),
            urgent: self.is_urgent(),
            expired: self.is_expired(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CountdownView {
    pub remaining_seconds: u32,
    pub display: String,
    pub urgent: bool,
    pub expired: bool,
}

/// Countdown driven by a background interval task.
///
/// Ticks once per period until it hits zero. The task is aborted when the
/// timer is dropped.
pub struct CountdownTimer {
    remaining: Arc<AtomicU32>,
    task: JoinHandle<()>,
}

impl CountdownTimer {
    /// Must be called from within a tokio runtime
    pub fn start(seconds: u32) -> Self {
        Self::with_period(seconds, Duration::from_secs(1))
    }

    pub fn with_period(seconds: u32, period: Duration) -> Self {
        let remaining = Arc::new(AtomicU32::new(seconds));
        let counter = remaining.clone();

        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                let previous = counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1));
                // Stop once zero has been reached; the value stays there
                if matches!(previous, Ok(1) | Err(_)) {
                    break;
                }
            }
        });

        Self { remaining, task }
    }

    pub fn snapshot(&self) -> Countdown {
        Countdown::new(self.remaining.load(Ordering::SeqCst))
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_floors_at_zero() {
        let mut countdown = Countdown::new(DEFAULT_COUNTDOWN_SECONDS);
        for _ in 0..300 {
            countdown.tick();
        }
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.is_expired());

        for _ in 0..10 {
            assert_eq!(countdown.tick(), 0);
        }
    }

    #[test]
    fn test_display_and_urgency() {
        assert_eq!(Countdown::new(300).display(), "5:00");
        assert_eq!(Countdown::new(61).display(), "1:01");
        assert_eq!(Countdown::new(9).display(), "0:09");

        assert!(!Countdown::new(60).is_urgent());
        assert!(Countdown::new(59).is_urgent());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_once_per_second() {
        let timer = CountdownTimer::start(300);
        assert_eq!(timer.snapshot().remaining(), 300);

        tokio::time::sleep(Duration::from_millis(150_500)).await;
        assert_eq!(timer.snapshot().remaining(), 150);

        tokio::time::sleep(Duration::from_secs(400)).await;
        assert_eq!(timer.snapshot().remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_timer_freezes() {
        let timer = CountdownTimer::start(300);
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        timer.stop();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(timer.snapshot().remaining(), 290);
    }
}
