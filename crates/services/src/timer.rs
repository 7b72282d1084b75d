use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// One-shot countdown owned by the active quiz session.
///
/// A background task ticks once per second and publishes the remaining
/// seconds on a watch channel. The timeout signal fires exactly once, when
/// the countdown reaches zero. `dispose` (also run on drop) aborts the tick
/// task unconditionally, so a session that gets replaced can never be moved
/// along by a timer it no longer owns.
pub struct CountdownTimer {
    remaining: watch::Receiver<u32>,
    task: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// Start counting down from `total_seconds`.
    ///
    /// With `total_seconds == 0` the timeout is signalled immediately and no
    /// tick task is spawned.
    #[must_use]
    pub fn start(total_seconds: u32) -> Self {
        let (tx, rx) = watch::channel(total_seconds);
        if total_seconds == 0 {
            return Self {
                remaining: rx,
                task: None,
            };
        }

        let task = tokio::spawn(async move {
            let mut ticks = time::interval(Duration::from_secs(1));
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes at once; the countdown
            // starts on the one after it.
            ticks.tick().await;

            let mut left = total_seconds;
            while left > 0 {
                ticks.tick().await;
                left -= 1;
                if tx.send(left).is_err() {
                    return;
                }
            }
        });

        Self {
            remaining: rx,
            task: Some(task),
        }
    }

    /// Callback form of the constructor: `on_timeout` is invoked once when
    /// the countdown expires, and never if the timer is disposed first.
    #[must_use]
    pub fn start_with(total_seconds: u32, on_timeout: impl FnOnce() + Send + 'static) -> Self {
        let timer = Self::start(total_seconds);
        let mut expiry = timer.subscribe();
        tokio::spawn(async move {
            if expiry.wait_for(|left| *left == 0).await.is_ok() {
                on_timeout();
            }
        });
        timer
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        *self.remaining.borrow()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.remaining_seconds() > 0
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Watch the remaining seconds, e.g. for a reactive display.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    /// Resolves with `true` once the countdown reaches zero (immediately if
    /// it already has), or `false` if the timer is disposed first.
    pub async fn timed_out(&self) -> bool {
        let mut expiry = self.remaining.clone();
        expiry.wait_for(|left| *left == 0).await.is_ok()
    }

    /// Stop the underlying ticking unconditionally. Must run when the
    /// session owning this timer is torn down or replaced.
    pub fn dispose(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Render remaining seconds as zero-padded `MM:SS`. Standard minute
/// rollover only; there is no hour field.
#[must_use]
pub fn format_mm_ss(seconds: u32) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn counts_down_once_per_second() {
        let timer = CountdownTimer::start(3);
        assert_eq!(timer.remaining_seconds(), 3);
        assert!(timer.is_running());

        let mut ticks = timer.subscribe();
        let mut seen = Vec::new();
        while ticks.changed().await.is_ok() {
            seen.push(*ticks.borrow());
            if *ticks.borrow() == 0 {
                break;
            }
        }

        assert_eq!(seen, vec![2, 1, 0]);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_fires_immediately_without_ticking() {
        let timer = CountdownTimer::start(0);
        assert_eq!(timer.remaining_seconds(), 0);
        assert!(!timer.is_running());
        assert!(timer.timed_out().await);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_callback_fires_once_on_expiry() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let _timer = CountdownTimer::start_with(2, move || {
            tx.send(()).expect("timeout receiver alive");
        });
        rx.await.expect("timeout fired");
    }

    #[tokio::test(start_paused = true)]
    async fn disposed_timer_never_times_out() {
        let mut timer = CountdownTimer::start(60);
        timer.dispose();
        assert!(!timer.timed_out().await);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_suppresses_its_callback() {
        let (tx, mut rx) = tokio::sync::oneshot::channel::<()>();
        let timer = CountdownTimer::start_with(5, move || {
            let _ = tx.send(());
        });
        drop(timer);

        // Well past where the countdown would have expired.
        time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn formats_zero_padded_minutes_and_seconds() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(9), "00:09");
        assert_eq!(format_mm_ss(75), "01:15");
        assert_eq!(format_mm_ss(600), "10:00");
        // Minutes keep rolling past the hour; there is no hour field.
        assert_eq!(format_mm_ss(3_661), "61:01");
    }
}
