use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use query::Verdict;

pub struct Metrics {
    // Counters
    page_views: AtomicUsize,
    detector_requests: AtomicUsize,
    empty_submissions: AtomicUsize,

    // Verdicts
    fake_verdicts: AtomicUsize,
    real_verdicts: AtomicUsize,
    inconclusive_verdicts: AtomicUsize,

    // Timing (in microseconds)
    total_detect_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            page_views: AtomicUsize::new(0),
            detector_requests: AtomicUsize::new(0),
            empty_submissions: AtomicUsize::new(0),
            fake_verdicts: AtomicUsize::new(0),
            real_verdicts: AtomicUsize::new(0),
            inconclusive_verdicts: AtomicUsize::new(0),
            total_detect_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_page_view(&self) {
        self.page_views.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_submission(&self) {
        self.detector_requests.fetch_add(1, Ordering::Relaxed);
        self.empty_submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection(&self, verdict: Verdict, duration: Duration) {
        self.detector_requests.fetch_add(1, Ordering::Relaxed);
        let counter = match verdict {
            Verdict::Fake => &self.fake_verdicts,
            Verdict::Real => &self.real_verdicts,
            Verdict::Inconclusive => &self.inconclusive_verdicts,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_detect_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let fake = self.fake_verdicts.load(Ordering::Relaxed);
        let real = self.real_verdicts.load(Ordering::Relaxed);
        let inconclusive = self.inconclusive_verdicts.load(Ordering::Relaxed);

        MetricsSnapshot {
            page_views: self.page_views.load(Ordering::Relaxed),
            detector_requests: self.detector_requests.load(Ordering::Relaxed),
            empty_submissions: self.empty_submissions.load(Ordering::Relaxed),
            fake_verdicts: fake,
            real_verdicts: real,
            inconclusive_verdicts: inconclusive,
            avg_detect_time_ms: avg_time_ms(&self.total_detect_time_us, fake + real + inconclusive),
        }
    }
}

fn avg_time_ms(total_us: &AtomicU64, count: usize) -> f64 {
    let total = total_us.load(Ordering::Relaxed) as f64;
    if count > 0 {
        total / count as f64 / 1000.0 // Convert to ms
    } else {
        0.0
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub page_views: usize,
    pub detector_requests: usize,
    pub empty_submissions: usize,
    pub fake_verdicts: usize,
    pub real_verdicts: usize,
    pub inconclusive_verdicts: usize,
    pub avg_detect_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
