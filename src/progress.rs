//! Advisory render progress: an atomic rows-completed counter plus a thread
//! that polls it and draws a progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
pub struct Progress {
    completed: AtomicU64,
    total: AtomicU64,
    finished: AtomicBool,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the counter for a render of `total` rows.
    pub fn start(&self, total: u64) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
        self.finished.store(false, Ordering::Release);
    }

    #[inline]
    pub fn row_done(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rows_completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => (self.rows_completed() as f64 / total as f64).min(1.0),
        }
    }

    pub fn finish(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

/// Background thread drawing the progress bar until [`Progress::finish`].
pub struct Reporter {
    handle: JoinHandle<()>,
}

impl Reporter {
    pub fn spawn(progress: Arc<Progress>, interval: Duration) -> Self {
        let handle = thread::spawn(move || {
            let bar = ProgressBar::new(progress.total());
            if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
                bar.set_style(style);
            }
            while !progress.is_finished() && !(progress.total() > 0 && progress.fraction() >= 1.0) {
                bar.set_length(progress.total());
                bar.set_position(progress.rows_completed());
                thread::sleep(interval);
            }
            bar.set_position(progress.rows_completed());
            bar.finish();
            debug!("progress reporter stopped at {:.1}%", progress.fraction() * 100.0);
        });
        Self { handle }
    }

    pub fn join(self) {
        if self.handle.join().is_err() {
            warn!("progress reporter thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_monotonic_and_bounded() {
        let p = Progress::new();
        assert_eq!(p.fraction(), 0.0);
        p.start(4);
        p.row_done();
        p.row_done();
        assert_eq!(p.rows_completed(), 2);
        assert_eq!(p.total(), 4);
        assert_eq!(p.fraction(), 0.5);
    }

    #[test]
    fn concurrent_increments_are_all_counted() {
        let p = Progress::new();
        p.start(8 * 1000);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        p.row_done();
                    }
                });
            }
        });
        assert_eq!(p.rows_completed(), 8000);
        assert_eq!(p.fraction(), 1.0);
    }

    #[test]
    fn reporter_exits_after_finish() {
        let p = Arc::new(Progress::new());
        p.start(10);
        let reporter = Reporter::spawn(p.clone(), Duration::from_millis(1));
        for _ in 0..10 {
            p.row_done();
        }
        p.finish();
        reporter.join();
        assert!(p.is_finished());
    }
}
