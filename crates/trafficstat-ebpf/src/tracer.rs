//! Packet trace initialization.
//!
//! Registers the packet trace data source with the tracing backend. The
//! trigger is one-shot: the first call initializes, later calls do nothing.
//! Failures are reported through logging only.

use std::path::PathBuf;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

use trafficstat_common::constants;

use crate::programs::trace::{PACKET_TRACE_DATA_SOURCE, PACKET_TRACE_RINGBUF};

/// Entry point of the packet tracing subsystem.
pub trait NetworkTracer: Send + Sync {
    /// Initializes tracing. Safe to call any number of times.
    fn init(&self);
}

/// Trace handler feeding the packet trace ring buffer into the trace
/// data source.
#[derive(Debug)]
pub struct NetworkTraceHandler {
    pin_dir: PathBuf,
    once: Once,
    ready: AtomicBool,
}

impl NetworkTraceHandler {
    /// Creates a handler that looks for the ring buffer under `pin_dir`.
    #[must_use]
    pub fn new(pin_dir: impl Into<PathBuf>) -> Self {
        Self {
            pin_dir: pin_dir.into(),
            once: Once::new(),
            ready: AtomicBool::new(false),
        }
    }

    /// Returns whether initialization has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.once.is_completed()
    }

    /// Returns whether the packet trace ring buffer was found at init.
    #[must_use]
    pub fn has_packet_source(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn register(&self) {
        let ringbuf = self.pin_dir.join(PACKET_TRACE_RINGBUF);
        if ringbuf.exists() {
            self.ready.store(true, Ordering::Release);
            tracing::info!(
                data_source = PACKET_TRACE_DATA_SOURCE,
                ringbuf = %ringbuf.display(),
                "network packet tracing initialized"
            );
        } else {
            tracing::warn!(
                data_source = PACKET_TRACE_DATA_SOURCE,
                ringbuf = %ringbuf.display(),
                "packet trace ring buffer not pinned, tracing disabled"
            );
        }
    }
}

impl Default for NetworkTraceHandler {
    fn default() -> Self {
        Self::new(constants::BPF_PIN_DIR)
    }
}

impl NetworkTracer for NetworkTraceHandler {
    fn init(&self) {
        self.once.call_once(|| self.register());
    }
}
