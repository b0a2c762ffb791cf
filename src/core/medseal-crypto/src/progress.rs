//! Progress reporting for long-running cryptographic operations.
//!
//! Operations accept an optional [`ProgressSink`]. Events are delivered
//! synchronously on the calling thread, in stage order. A slow sink stalls the
//! operation that reports to it.

use tracing::trace;

/// A single progress update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Human-readable description of the current stage.
    pub stage: String,
    /// Overall completion percentage in `[0, 100]`.
    pub progress: f64,
    /// Bytes handled so far.
    pub bytes_processed: u64,
    /// Total bytes the operation will handle.
    pub total_bytes: u64,
}

/// Receiver of [`ProgressEvent`]s.
///
/// Implemented for every `FnMut(&ProgressEvent)` closure.
pub trait ProgressSink {
    /// Called once per event.
    fn report(&mut self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressEvent),
{
    fn report(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// A sink that records every event, for callers that prefer to consume the
/// sequence after the fact.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    events: Vec<ProgressEvent>,
}

impl ProgressLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first.
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    /// Consumes the log, yielding its events.
    pub fn into_events(self) -> Vec<ProgressEvent> {
        self.events
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<&ProgressEvent> {
        self.events.last()
    }

    /// Percentages only, in order.
    pub fn percentages(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.progress).collect()
    }
}

impl ProgressSink for ProgressLog {
    fn report(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards events to an optional sink while keeping percentages in range and
/// non-decreasing.
pub struct ProgressReporter<'a> {
    sink: Option<&'a mut dyn ProgressSink>,
    last: f64,
}

impl<'a> ProgressReporter<'a> {
    /// Wraps an optional sink. `None` silently discards every event.
    pub fn new(sink: Option<&'a mut dyn ProgressSink>) -> Self {
        Self { sink, last: 0.0 }
    }

    /// Returns `true` when events are delivered somewhere.
    pub fn is_active(&self) -> bool {
        self.sink.is_some()
    }

    /// Emits an event.
    ///
    /// `progress` is clamped to `[previous, 100]`.
    pub fn report(
        &mut self,
        stage: impl Into<String>,
        progress: f64,
        bytes_processed: u64,
        total_bytes: u64,
    ) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let progress = if progress.is_nan() {
            self.last
        } else {
            progress.clamp(self.last, 100.0)
        };
        self.last = progress;

        let event = ProgressEvent {
            stage: stage.into(),
            progress,
            bytes_processed,
            total_bytes,
        };
        trace!(stage = %event.stage, progress, bytes_processed, total_bytes, "Progress");
        sink.report(&event);
    }
}

impl std::fmt::Debug for ProgressReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("active", &self.is_active())
            .field("last", &self.last)
            .finish()
    }
}
