//! Observability and Metrics
//!
//! Counters for encode and decode traffic through the
//! [`Codec`](crate::codec::Codec) facade.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for codec operations
#[derive(Debug)]
pub struct Metrics {
    /// Successful encodes
    pub encodes_total: AtomicU64,
    /// Failed encodes
    pub encode_failures: AtomicU64,
    /// Successful decodes
    pub decodes_total: AtomicU64,
    /// Failed decodes
    pub decode_failures: AtomicU64,
    /// Bytes produced by successful encodes
    pub bytes_written: AtomicU64,
    /// Bytes consumed by successful decodes
    pub bytes_read: AtomicU64,
    /// Decodes that failed because of leftover input
    pub trailing_rejections: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            encodes_total: AtomicU64::new(0),
            encode_failures: AtomicU64::new(0),
            decodes_total: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            trailing_rejections: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a successful encode
    pub fn encoded(&self, byte_count: u64) {
        self.encodes_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a failed encode
    pub fn encode_failed(&self) {
        self.encode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful decode
    pub fn decoded(&self, byte_count: u64) {
        self.decodes_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a failed decode
    pub fn decode_failed(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a decode rejected for trailing bytes
    pub fn trailing_rejected(&self) {
        self.trailing_rejections.fetch_add(1, Ordering::Relaxed);
        self.decode_failed();
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            encodes_total: self.encodes_total.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            decodes_total: self.decodes_total.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            trailing_rejections: self.trailing_rejections.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            encodes_total = snapshot.encodes_total,
            encode_failures = snapshot.encode_failures,
            decodes_total = snapshot.decodes_total,
            decode_failures = snapshot.decode_failures,
            bytes_written = snapshot.bytes_written,
            bytes_read = snapshot.bytes_read,
            trailing_rejections = snapshot.trailing_rejections,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub encodes_total: u64,
    pub encode_failures: u64,
    pub decodes_total: u64,
    pub decode_failures: u64,
    pub bytes_written: u64,
    pub bytes_read: u64,
    pub trailing_rejections: u64,
    pub uptime_seconds: u64,
}

static METRICS: OnceLock<Arc<Metrics>> = OnceLock::new();

/// Get the process-wide metrics instance
///
/// Codecs record here unless given their own collector.
pub fn global_metrics() -> Arc<Metrics> {
    Arc::clone(METRICS.get_or_init(|| Arc::new(Metrics::new())))
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
