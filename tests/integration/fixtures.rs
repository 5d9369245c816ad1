//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Recording foreground hosts that capture every status update
//! - Expected tick sequences for countdown assertions

use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use scatrack::tracking::{ForegroundHost, StatusHandle, COUNTDOWN_START, DISPATCH_STATUS};

/// Foreground host that records every status text with its timestamp.
///
/// Updates happen synchronously on the tracking worker, so the recorded
/// order is the exact display order and the timestamps are the tick
/// deadlines.
#[derive(Default)]
pub struct RecordingForeground {
    updates: Arc<Mutex<Vec<(Instant, String)>>>,
    releases: Arc<Mutex<usize>>,
}

impl RecordingForeground {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All recorded status texts, in display order.
    pub fn texts(&self) -> Vec<String> {
        self.updates
            .lock()
            .map(|u| u.iter().map(|(_, t)| t.clone()).collect())
            .unwrap_or_default()
    }

    /// Timestamps of every recorded status, in display order.
    pub fn timestamps(&self) -> Vec<Instant> {
        self.updates
            .lock()
            .map(|u| u.iter().map(|(at, _)| *at).collect())
            .unwrap_or_default()
    }

    /// How many reservations have been released.
    pub fn release_count(&self) -> usize {
        self.releases.lock().map(|r| *r).unwrap_or(0)
    }
}

impl ForegroundHost for RecordingForeground {
    fn reserve(&self, initial: &str) -> Box<dyn StatusHandle> {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push((Instant::now(), initial.to_string()));
        }
        Box::new(RecordingHandle {
            updates: Arc::clone(&self.updates),
            releases: Arc::clone(&self.releases),
        })
    }
}

struct RecordingHandle {
    updates: Arc<Mutex<Vec<(Instant, String)>>>,
    releases: Arc<Mutex<usize>>,
}

impl StatusHandle for RecordingHandle {
    fn update(&mut self, text: &str) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push((Instant::now(), text.to_string()));
        }
    }

    fn release(self: Box<Self>) {
        if let Ok(mut releases) = self.releases.lock() {
            *releases += 1;
        }
    }
}

/// The full expected status sequence for one run: the dispatch text
/// followed by the eleven countdown ticks.
pub fn expected_statuses() -> Vec<String> {
    let mut expected = vec![DISPATCH_STATUS.to_string()];
    for remaining in (0..=COUNTDOWN_START).rev() {
        expected.push(format!("{} seconds to destination", remaining));
    }
    expected
}
