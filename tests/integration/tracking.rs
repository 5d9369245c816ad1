//! Tracking phase tests.
//!
//! The countdown contract: eleven ticks from 10 down to 0 inclusive, one
//! second apart, followed by exactly one arrival event on the bus.

use std::sync::Arc;
use std::time::Duration;

use scatrack::tracking::{
    CompletionBus, ForegroundHost, RouteTracker, COUNTDOWN_START, TICK_INTERVAL,
};
use scatrack::{AgentId, Error};
use tokio_test::assert_err;

use crate::fixtures::{expected_statuses, RecordingForeground};

fn tracker_with(
    recorder: &Arc<RecordingForeground>,
    bus: &CompletionBus,
) -> RouteTracker {
    RouteTracker::new(
        Arc::clone(recorder) as Arc<dyn ForegroundHost>,
        bus.clone(),
    )
}

/// Test: Tick sequence is exact
/// Given a run started with a non-empty id
/// When it completes
/// Then the status sequence is dispatch, then 10..=0, nothing skipped or
/// repeated, and the reservation is released
#[tokio::test(start_paused = true)]
async fn test_tick_sequence_ten_to_zero() {
    let recorder = RecordingForeground::new();
    let bus = CompletionBus::new();
    let tracker = tracker_with(&recorder, &bus);

    tracker.start("007").unwrap().join().await.unwrap();

    assert_eq!(recorder.texts(), expected_statuses());
    assert_eq!(recorder.release_count(), 1);
}

/// Test: Ticks land on one-second deadlines
/// Given a run under a paused clock
/// When ticks are recorded with timestamps
/// Then tick n fires exactly n seconds after the run began, with no drift
#[tokio::test(start_paused = true)]
async fn test_tick_cadence_is_one_second() {
    let recorder = RecordingForeground::new();
    let bus = CompletionBus::new();
    let tracker = tracker_with(&recorder, &bus);

    tracker.start("007").unwrap().join().await.unwrap();

    let timestamps = recorder.timestamps();
    assert_eq!(timestamps.len(), usize::from(COUNTDOWN_START) + 2);

    // First entry is the reservation; each tick is exactly one interval
    // after the previous.
    let start = timestamps[0];
    for (n, &at) in timestamps.iter().enumerate().skip(1) {
        assert_eq!(at - start, TICK_INTERVAL * n as u32);
    }
}

/// Test: One event per run, carrying the started id
#[tokio::test(start_paused = true)]
async fn test_single_arrival_event_carries_agent_id() {
    let recorder = RecordingForeground::new();
    let bus = CompletionBus::new();
    let tracker = tracker_with(&recorder, &bus);
    let mut arrivals = bus.subscribe();

    tracker.start("007").unwrap().join().await.unwrap();

    assert_eq!(arrivals.recv().await.unwrap(), AgentId::new("007").unwrap());
    tokio_test::assert_err!(arrivals.try_recv(), "more than one arrival event");
}

/// Test: Late subscribers get no replay
/// Given a run that has already published its arrival
/// When a subscriber joins afterwards
/// Then it receives nothing
#[tokio::test(start_paused = true)]
async fn test_late_subscriber_sees_no_replay() {
    let recorder = RecordingForeground::new();
    let bus = CompletionBus::new();
    let tracker = tracker_with(&recorder, &bus);

    tracker.start("007").unwrap().join().await.unwrap();

    let mut late = bus.subscribe();
    tokio::time::sleep(Duration::from_secs(1)).await;
    tokio_test::assert_err!(late.try_recv());
}

/// Test: Missing id aborts before anything happens
/// Given an empty identifier
/// When start is called
/// Then it fails fast, reserves nothing, and publishes nothing
#[tokio::test(start_paused = true)]
async fn test_missing_id_fails_fast_and_publishes_nothing() {
    let recorder = RecordingForeground::new();
    let bus = CompletionBus::new();
    let tracker = tracker_with(&recorder, &bus);
    let mut arrivals = bus.subscribe();

    assert!(matches!(tracker.start(""), Err(Error::MissingAgentId)));

    tokio::time::sleep(TICK_INTERVAL * 20).await;
    assert!(recorder.texts().is_empty());
    assert_eq!(recorder.release_count(), 0);
    assert!(arrivals.try_recv().is_err());
}
