//! Observability and Metrics
//!
//! Counters for datagram traffic and for what the synchronization handlers
//! did with each packet.
//!
//! Uses atomic counters so a snapshot can be taken from another thread while
//! the session keeps polling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use crate::sync::Outcome;

/// Session metrics collector
#[derive(Debug)]
pub struct Metrics {
    pub datagrams_received: AtomicU64,
    pub datagrams_sent: AtomicU64,
    pub bytes_received: AtomicU64,
    pub bytes_sent: AtomicU64,
    /// Control notifications received from the transport
    pub control_codes: AtomicU64,
    /// Requests answered with local state
    pub requests_answered: AtomicU64,
    pub updates_applied: AtomicU64,
    /// Packets whose precondition did not hold
    pub skipped: AtomicU64,
    pub ignored: AtomicU64,
    /// Datagrams dropped because they could not be decoded
    pub dropped: AtomicU64,
    pub handshakes_total: AtomicU64,
    pub handshakes_success: AtomicU64,
    pub handshakes_failed: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            datagrams_received: AtomicU64::new(0),
            datagrams_sent: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            control_codes: AtomicU64::new(0),
            requests_answered: AtomicU64::new(0),
            updates_applied: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            ignored: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            handshakes_total: AtomicU64::new(0),
            handshakes_success: AtomicU64::new(0),
            handshakes_failed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn datagram_received(&self, byte_count: u64) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn datagram_sent(&self, byte_count: u64) {
        self.datagrams_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn control_code(&self) {
        self.control_codes.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a handler outcome
    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Applied => &self.updates_applied,
            Outcome::Replied => &self.requests_answered,
            Outcome::Skipped => &self.skipped,
            Outcome::Ignored => &self.ignored,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn handshake_attempt(&self) {
        self.handshakes_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn handshake_success(&self) {
        self.handshakes_success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn handshake_failed(&self) {
        self.handshakes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            datagrams_sent: self.datagrams_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            control_codes: self.control_codes.load(Ordering::Relaxed),
            requests_answered: self.requests_answered.load(Ordering::Relaxed),
            updates_applied: self.updates_applied.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            handshakes_total: self.handshakes_total.load(Ordering::Relaxed),
            handshakes_success: self.handshakes_success.load(Ordering::Relaxed),
            handshakes_failed: self.handshakes_failed.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        info!(
            datagrams_received = snapshot.datagrams_received,
            datagrams_sent = snapshot.datagrams_sent,
            bytes_received = snapshot.bytes_received,
            bytes_sent = snapshot.bytes_sent,
            control_codes = snapshot.control_codes,
            requests_answered = snapshot.requests_answered,
            updates_applied = snapshot.updates_applied,
            skipped = snapshot.skipped,
            ignored = snapshot.ignored,
            dropped = snapshot.dropped,
            handshakes_total = snapshot.handshakes_total,
            handshakes_success = snapshot.handshakes_success,
            handshakes_failed = snapshot.handshakes_failed,
            uptime_seconds = snapshot.uptime_seconds,
            "Session metrics snapshot"
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
    pub datagrams_received: u64,
    pub datagrams_sent: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub control_codes: u64,
    pub requests_answered: u64,
    pub updates_applied: u64,
    pub skipped: u64,
    pub ignored: u64,
    pub dropped: u64,
    pub handshakes_total: u64,
    pub handshakes_success: u64,
    pub handshakes_failed: u64,
    pub uptime_seconds: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_land_in_their_counters() {
        let metrics = Metrics::new();
        metrics.record(Outcome::Replied);
        metrics.record(Outcome::Applied);
        metrics.record(Outcome::Applied);
        metrics.record(Outcome::Skipped);
        metrics.dropped();
        metrics.datagram_received(12);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_answered, 1);
        assert_eq!(snapshot.updates_applied, 2);
        assert_eq!(snapshot.skipped, 1);
        assert_eq!(snapshot.dropped, 1);
        assert_eq!(snapshot.bytes_received, 12);
    }
}
