//! Crawl statistics collected from instrumentation events

use crate::instrument::{Event, Instrumentation};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// When the crawl started
    pub started_at: Option<DateTime<Utc>>,

    /// When the last event was received
    pub last_event_at: Option<DateTime<Utc>>,

    /// Pages run through the pipeline
    pub pages_processed: u64,

    /// Responses skipped as not processable
    pub pages_ignored: u64,

    /// Locations handed back to the transport
    pub urls_queued: u64,

    /// Total time spent in the pipeline
    pub processing_time: Duration,
}

impl CrawlStats {
    /// Wall-clock time between the start and the last event
    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.last_event_at? - self.started_at?)
    }
}

/// Counts crawl events
#[derive(Debug, Default)]
pub struct StatsInstrumentation {
    pages_processed: AtomicU64,
    pages_ignored: AtomicU64,
    urls_queued: AtomicU64,
    processing_micros: AtomicU64,
    timing: Mutex<Timing>,
}

#[derive(Debug, Default)]
struct Timing {
    started_at: Option<DateTime<Utc>>,
    last_event_at: Option<DateTime<Utc>>,
}

impl StatsInstrumentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics collected so far
    pub fn snapshot(&self) -> CrawlStats {
        let (started_at, last_event_at) = match self.timing.lock() {
            Ok(timing) => (timing.started_at, timing.last_event_at),
            Err(poisoned) => {
                let timing = poisoned.into_inner();
                (timing.started_at, timing.last_event_at)
            }
        };

        CrawlStats {
            started_at,
            last_event_at,
            pages_processed: self.pages_processed.load(Ordering::Relaxed),
            pages_ignored: self.pages_ignored.load(Ordering::Relaxed),
            urls_queued: self.urls_queued.load(Ordering::Relaxed),
            processing_time: Duration::from_micros(self.processing_micros.load(Ordering::Relaxed)),
        }
    }

    fn touch(&self, running: bool) {
        let now = Utc::now();
        let mut timing = match self.timing.lock() {
            Ok(timing) => timing,
            Err(poisoned) => poisoned.into_inner(),
        };

        if running && timing.started_at.is_none() {
            timing.started_at = Some(now);
        }
        timing.last_event_at = Some(now);
    }
}

impl Instrumentation for StatsInstrumentation {
    fn emit(&self, event: &Event<'_>) {
        match event {
            Event::Running { .. } => {}
            Event::ProcessResponse { elapsed, .. } => {
                self.pages_processed.fetch_add(1, Ordering::Relaxed);
                let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
                self.processing_micros.fetch_add(micros, Ordering::Relaxed);
            }
            Event::IgnoreResponse { .. } => {
                self.pages_ignored.fetch_add(1, Ordering::Relaxed);
            }
            Event::Queued { urls } => {
                self.urls_queued.fetch_add(urls.len() as u64, Ordering::Relaxed);
            }
        }

        self.touch(matches!(event, Event::Running { .. }));
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for records.
pub fn print_statistics(stats: &CrawlStats) {
    eprintln!("=== Crawl Statistics ===\n");

    if let Some(started_at) = stats.started_at {
        eprintln!("Started: {}", started_at.to_rfc3339());
    }
    if let Some(duration) = stats.duration() {
        eprintln!("Duration: {:.3}s", duration.num_milliseconds() as f64 / 1000.0);
    }
    eprintln!();

    let total = stats.pages_processed + stats.pages_ignored;
    eprintln!("Pages:");
    eprintln!("  Fetched: {}", total);
    eprintln!("  Processed: {}", stats.pages_processed);
    eprintln!("  Ignored: {}", stats.pages_ignored);
    eprintln!("  Locations queued: {}", stats.urls_queued);
    eprintln!();

    let average = if stats.pages_processed > 0 {
        stats.processing_time.as_secs_f64() * 1000.0 / stats.pages_processed as f64
    } else {
        0.0
    };

    eprintln!(
        "Processing time: {:.3}s total, {:.2}ms per page",
        stats.processing_time.as_secs_f64(),
        average
    );
}
