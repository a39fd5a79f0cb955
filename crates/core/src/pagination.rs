//! Bounded pagination with fixed pacing.

use std::{cell::RefCell, thread, time::Duration};

use anyhow::Result;
use tracing::error;

/// Something that can block for a while between requests.
pub trait Delay {
    /// Wait for `duration`.
    fn wait(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Delay for ThreadSleep {
    fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn wait(&self, _duration: Duration) {}
}

/// Records requested waits without blocking.
#[derive(Debug, Default)]
pub struct RecordedDelay {
    waits: RefCell<Vec<Duration>>,
}

impl RecordedDelay {
    /// Every wait requested so far, in order.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.borrow().clone()
    }
}

impl Delay for RecordedDelay {
    fn wait(&self, duration: Duration) {
        self.waits.borrow_mut().push(duration);
    }
}

/// Fixed waits applied after each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Wait after a page succeeded.
    pub after_success: Duration,
    /// Wait after a page failed.
    pub after_failure: Duration,
}

impl Pacing {
    /// No waiting at all.
    pub const NONE: Pacing = Pacing {
        after_success: Duration::ZERO,
        after_failure: Duration::ZERO,
    };
}

/// Arithmetic sequence of page cursors: `start, start + step, ...` while below `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    next: u32,
    end: u32,
    step: u32,
}

impl PageRange {
    /// Cursors `start, start + step, ...` strictly below `end`.
    pub fn new(start: u32, end: u32, step: u32) -> Self {
        Self {
            next: start,
            end,
            step: step.max(1),
        }
    }

    /// Offsets `0, page_size, ...` while below `max_records`.
    pub fn offsets(page_size: u32, max_records: u32) -> Self {
        Self::new(0, max_records, page_size)
    }

    /// One-based page numbers `1..=max_pages`.
    pub fn pages(max_pages: u32) -> Self {
        Self::new(1, max_pages.saturating_add(1), 1)
    }
}

impl Iterator for PageRange {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.next >= self.end {
            return None;
        }
        let current = self.next;
        self.next = self.next.saturating_add(self.step);
        if self.next == current {
            self.end = current;
        }
        Some(current)
    }
}

/// Outcome counters for a finished pagination run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Pages attempted.
    pub requested: usize,
    /// Pages that completed.
    pub succeeded: usize,
    /// Pages that were skipped after an error.
    pub failed: usize,
}

/// Walks a [`PageRange`], pacing between pages and skipping failed ones.
#[derive(Debug, Clone)]
pub struct Paginator<D = ThreadSleep> {
    pacing: Pacing,
    delay: D,
}

impl Paginator<ThreadSleep> {
    /// Paginator that sleeps the calling thread.
    pub fn new(pacing: Pacing) -> Self {
        Self::with_delay(pacing, ThreadSleep)
    }
}

impl<D: Delay> Paginator<D> {
    /// Paginator with a custom delay implementation.
    pub fn with_delay(pacing: Pacing, delay: D) -> Self {
        Self { pacing, delay }
    }

    /// Access the delay, mostly for inspection in tests.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Call `visit` once per cursor. Errors are logged and the page is skipped;
    /// the cursor always advances.
    pub fn run<F>(&self, label: &str, pages: PageRange, mut visit: F) -> PageReport
    where
        F: FnMut(u32) -> Result<()>,
    {
        let mut report = PageReport::default();
        for cursor in pages {
            report.requested += 1;
            match visit(cursor) {
                Ok(()) => {
                    report.succeeded += 1;
                    self.delay.wait(self.pacing.after_success);
                }
                Err(err) => {
                    report.failed += 1;
                    error!("{label}: page {cursor} failed: {err:#}");
                    self.delay.wait(self.pacing.after_failure);
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn offsets_stop_below_cap() {
        let offsets: Vec<u32> = PageRange::offsets(500, 5_000).collect();
        assert_eq!(offsets.len(), 10);
        assert_eq!(offsets.first(), Some(&0));
        assert_eq!(offsets.last(), Some(&4_500));

        // A cap that is not a multiple of the page size still requests the partial page.
        assert_eq!(PageRange::offsets(500, 1_200).collect::<Vec<_>>(), vec![0, 500, 1_000]);
    }

    #[test]
    fn pages_are_one_based_and_inclusive() {
        assert_eq!(PageRange::pages(3).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(PageRange::pages(0).count(), 0);
    }

    #[test]
    fn range_terminates_near_u32_max() {
        let cursors: Vec<u32> = PageRange::new(u32::MAX - 1, u32::MAX, 10).collect();
        assert_eq!(cursors, vec![u32::MAX - 1]);
    }

    #[test]
    fn failures_are_skipped_and_paced() {
        let pacing = Pacing {
            after_success: Duration::from_millis(1_500),
            after_failure: Duration::from_secs(5),
        };
        let paginator = Paginator::with_delay(pacing, RecordedDelay::default());
        let mut seen = Vec::new();

        let report = paginator.run("test", PageRange::pages(4), |page| {
            seen.push(page);
            if page == 2 {
                bail!("boom");
            }
            Ok(())
        });

        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(
            report,
            PageReport {
                requested: 4,
                succeeded: 3,
                failed: 1
            }
        );
        assert_eq!(
            paginator.delay().waits(),
            vec![
                Duration::from_millis(1_500),
                Duration::from_secs(5),
                Duration::from_millis(1_500),
                Duration::from_millis(1_500),
            ]
        );
    }
}
