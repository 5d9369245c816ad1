//! Full pipeline scenarios: chain dispatch through arrival.

use std::sync::Arc;

use tokio::sync::mpsc;

use scatrack::chain::{ChainEvent, MissionChain};
use scatrack::tracking::{CompletionBus, ForegroundHost, RouteTracker};
use scatrack::work::{Chore, WorkQueue};
use scatrack::AgentId;

use crate::fixtures::{expected_statuses, RecordingForeground};

/// Drive one full mission: dispatch the chain for `agent_id`, start
/// tracking with `tracking_id` on the handoff event, and return the
/// notices and the arrival payload.
async fn run_mission(
    agent_id: &str,
    tracking_id: &str,
    recorder: &Arc<RecordingForeground>,
    bus: &CompletionBus,
) -> (Vec<String>, AgentId) {
    let queue = WorkQueue::new();
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let chain = MissionChain::new(queue, events_tx);
    chain.dispatch(agent_id).await.unwrap();

    let tracker = RouteTracker::new(
        Arc::clone(recorder) as Arc<dyn ForegroundHost>,
        bus.clone(),
    );
    let mut arrivals = bus.subscribe();

    let mut notices = Vec::new();
    let run = loop {
        match events_rx.recv().await.unwrap() {
            ChainEvent::ChoreFinished { message, .. } => notices.push(message),
            ChainEvent::ChainComplete => break tracker.start(tracking_id).unwrap(),
        }
    };

    assert_eq!(
        notices.len(),
        4,
        "tracking must start only after every chore notice"
    );

    let arrived = arrivals.recv().await.unwrap();
    run.join().await.unwrap();

    // No further handoff events may be pending: tracking starts exactly
    // once per mission.
    drop(chain);
    while let Some(event) = events_rx.recv().await {
        assert!(!matches!(event, ChainEvent::ChainComplete));
    }

    (notices, arrived)
}

/// Test: E2E happy path
/// Given the chain dispatched with "CatAgent1"
/// When the chores finish in order and the handoff starts tracking as "007"
/// Then 11 ticks occur and the arrival event carries "007"
#[tokio::test(start_paused = true)]
async fn test_e2e_chain_then_tracking() {
    let recorder = RecordingForeground::new();
    let bus = CompletionBus::new();

    let (notices, arrived) = run_mission("CatAgent1", "007", &recorder, &bus).await;

    let expected_notices: Vec<String> = Chore::ALL
        .iter()
        .map(|c| c.completion_message().to_string())
        .collect();
    assert_eq!(notices, expected_notices);

    // Dispatch status plus the eleven countdown ticks.
    assert_eq!(recorder.texts(), expected_statuses());
    assert_eq!(arrived, AgentId::new("007").unwrap());
}

/// Test: The chain id and the tracking id stay independent
/// Given a chain dispatched with one identity and tracking started with
/// another
/// Then the arrival event carries the tracking identity, untouched by the
/// chain's
#[tokio::test(start_paused = true)]
async fn test_chain_and_tracking_identities_are_independent() {
    let recorder = RecordingForeground::new();
    let bus = CompletionBus::new();

    let (_, arrived) = run_mission("CatAgent1", "007", &recorder, &bus).await;
    assert_ne!(arrived, AgentId::new("CatAgent1").unwrap());
    assert_eq!(arrived, AgentId::new("007").unwrap());
}

/// Test: Idempotence across runs
/// Given the full pipeline run twice in one process
/// Then each run yields its own internally-consistent arrival event and
/// full tick sequence
#[tokio::test(start_paused = true)]
async fn test_two_missions_yield_two_independent_arrivals() {
    let bus = CompletionBus::new();

    let first_recorder = RecordingForeground::new();
    let (_, first) = run_mission("CatAgent1", "007", &first_recorder, &bus).await;

    let second_recorder = RecordingForeground::new();
    let (_, second) = run_mission("CatAgent1", "007", &second_recorder, &bus).await;

    assert_eq!(first, AgentId::new("007").unwrap());
    assert_eq!(second, AgentId::new("007").unwrap());
    assert_eq!(first_recorder.texts(), expected_statuses());
    assert_eq!(second_recorder.texts(), expected_statuses());
    assert_eq!(first_recorder.release_count(), 1);
    assert_eq!(second_recorder.release_count(), 1);
}
