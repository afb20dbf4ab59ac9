//! Crawl instrumentation
//!
//! The crawler reports what it does through [`Instrumentation`] sinks. Events are
//! emitted synchronously, in order, from the task driving the crawl.

mod stats;

pub use stats::{print_statistics, CrawlStats, StatsInstrumentation};

use crate::pipeline::ResultRecord;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Something the crawler did
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A crawl started from these locations
    Running { urls: &'a [Url] },

    /// A response went through the pipeline
    ProcessResponse {
        url: &'a Url,
        record: &'a ResultRecord,
        elapsed: Duration,
    },

    /// A response was not worth processing
    IgnoreResponse { url: &'a Url },

    /// Newly discovered locations were handed back to the transport
    Queued { urls: &'a [Url] },
}

impl Event<'_> {
    /// Event name, as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::Running { .. } => "running",
            Event::ProcessResponse { .. } => "process_response",
            Event::IgnoreResponse { .. } => "ignore_response",
            Event::Queued { .. } => "queued",
        }
    }
}

/// Receives crawl events
///
/// Implementations must not block for long: emission happens inline with the crawl.
pub trait Instrumentation: Send + Sync {
    fn emit(&self, event: &Event<'_>);
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInstrumentation;

impl Instrumentation for NoopInstrumentation {
    fn emit(&self, _event: &Event<'_>) {}
}

/// Logs every event with `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInstrumentation;

impl Instrumentation for TracingInstrumentation {
    fn emit(&self, event: &Event<'_>) {
        match event {
            Event::Running { urls } => {
                tracing::info!("Crawl running from {}", join(urls));
            }
            Event::ProcessResponse { url, elapsed, .. } => {
                tracing::debug!("Processed {} in {:?}", url, elapsed);
            }
            Event::IgnoreResponse { url } => {
                tracing::debug!("Ignored {}", url);
            }
            Event::Queued { urls } => {
                if !urls.is_empty() {
                    tracing::debug!("Queued {} location(s): {}", urls.len(), join(urls));
                }
            }
        }
    }
}

fn join(urls: &[Url]) -> String {
    urls.iter().map(Url::as_str).collect::<Vec<_>>().join(", ")
}

/// Forwards every event to several sinks, in order
#[derive(Clone, Default)]
pub struct FanoutInstrumentation {
    sinks: Vec<Arc<dyn Instrumentation>>,
}

impl FanoutInstrumentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn Instrumentation>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Instrumentation for FanoutInstrumentation {
    fn emit(&self, event: &Event<'_>) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}
