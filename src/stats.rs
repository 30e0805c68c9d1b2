//! Run statistics
//!
//! Counters shared by the concurrent stages of a run. All counters are
//! atomics, so stages record through a shared reference without locking.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters for one run
#[derive(Debug)]
pub struct RunStats {
    /// Per-service pages fetched
    pub pages_fetched: AtomicU64,
    /// Pages whose content container matched nothing
    pub extraction_misses: AtomicU64,
    /// Images written to disk
    pub images_downloaded: AtomicU64,
    /// Images already present locally
    pub images_skipped: AtomicU64,
    /// Image bytes written
    pub bytes_downloaded: AtomicU64,
    started: Instant,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    /// Fresh counters, clock starting now
    pub fn new() -> Self {
        Self {
            pages_fetched: AtomicU64::new(0),
            extraction_misses: AtomicU64::new(0),
            images_downloaded: AtomicU64::new(0),
            images_skipped: AtomicU64::new(0),
            bytes_downloaded: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record a fetched service page
    pub fn record_page(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an extraction miss
    pub fn record_miss(&self) {
        self.extraction_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a downloaded image of `bytes` bytes
    pub fn record_image_downloaded(&self, bytes: u64) {
        self.images_downloaded.fetch_add(1, Ordering::Relaxed);
        self.bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record an image served from the local cache
    pub fn record_image_skipped(&self) {
        self.images_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Time since the counters were created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Point-in-time summary
    pub fn snapshot(&self, sections: usize, output: PathBuf) -> RunSummary {
        RunSummary {
            sections,
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            extraction_misses: self.extraction_misses.load(Ordering::Relaxed),
            images_downloaded: self.images_downloaded.load(Ordering::Relaxed),
            images_skipped: self.images_skipped.load(Ordering::Relaxed),
            bytes_downloaded: self.bytes_downloaded.load(Ordering::Relaxed),
            elapsed_ms: self.elapsed().as_millis() as u64,
            output,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Sections in the book
    pub sections: usize,
    /// Per-service pages fetched
    pub pages_fetched: u64,
    /// Pages whose content container matched nothing
    pub extraction_misses: u64,
    /// Images written to disk
    pub images_downloaded: u64,
    /// Images already present locally
    pub images_skipped: u64,
    /// Image bytes written
    pub bytes_downloaded: u64,
    /// Wall time of the run
    pub elapsed_ms: u64,
    /// Output file
    pub output: PathBuf,
}
