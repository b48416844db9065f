//! Tests for pagination module

use super::*;
use crate::error::{Error, ErrorKind};
use crate::types::{ListId, ListKind};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::Semaphore;
use tokio_test::{assert_pending, assert_ready_eq, block_on, task};

// ============================================================================
// Test Fetcher
// ============================================================================

/// Replays canned outcomes: per-kind ones first, then the shared queue in
/// order. Fetches for gated kinds wait for a permit.
struct ScriptedFetcher {
    responses: Mutex<VecDeque<FetchOutcome<&'static str>>>,
    by_kind: Mutex<HashMap<ListKind, FetchOutcome<&'static str>>>,
    calls: Mutex<Vec<(ListKind, u32)>>,
    gates: HashMap<ListKind, Arc<Semaphore>>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<FetchOutcome<&'static str>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            by_kind: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gates: HashMap::new(),
        }
    }

    fn with_response(self, kind: ListKind, outcome: FetchOutcome<&'static str>) -> Self {
        self.by_kind.lock().unwrap().insert(kind, outcome);
        self
    }

    fn with_gate(mut self, kind: ListKind, gate: Arc<Semaphore>) -> Self {
        self.gates.insert(kind, gate);
        self
    }

    fn calls(&self) -> Vec<(ListKind, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    type Item = &'static str;

    async fn fetch_page(&self, kind: &ListKind, page: u32) -> FetchOutcome<&'static str> {
        self.calls.lock().unwrap().push((kind.clone(), page));
        if let Some(gate) = self.gates.get(kind) {
            gate.acquire().await.unwrap().forget();
        }
        if let Some(outcome) = self.by_kind.lock().unwrap().remove(kind) {
            return outcome;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected fetch")
    }
}

fn server_error() -> Error {
    Error::http_status(500, "Internal Server Error")
}

// ============================================================================
// ListState Tests
// ============================================================================

#[test]
fn test_list_state_default() {
    let state: ListState<&str> = ListState::new();
    assert!(state.items.is_empty());
    assert_eq!(state.current_page, 1);
    assert_eq!(state.total_pages, None);
    assert!(state.has_more);
    assert_eq!(state.phase, LoadPhase::Idle);
    assert!(state.last_error.is_none());
    assert!(state.can_load_initial());
    assert!(state.can_load_more());
}

#[test]
fn test_loading_flags_are_exclusive() {
    let mut state: ListState<&str> = ListState::new();

    state.begin_initial();
    assert!(state.is_loading_initial());
    assert!(!state.is_loading_more());
    assert!(!state.can_load_initial());
    assert!(!state.can_load_more());

    state.begin_more();
    assert!(!state.is_loading_initial());
    assert!(state.is_loading_more());
}

#[test]
fn test_missing_total_pages_stops_after_empty_page() {
    let mut state = ListState::new();

    state.begin_initial();
    state.apply_success(PageBatch::without_total(vec!["A"]));
    assert!(state.has_more);
    assert_eq!(state.current_page, 2);

    state.begin_more();
    state.apply_success(PageBatch::without_total(Vec::new()));
    assert!(!state.has_more);
    assert_eq!(state.current_page, 2);
    assert_eq!(state.items, vec!["A"]);
}

#[test]
fn test_trailing_index() {
    let mut state: ListState<&str> = ListState::new();
    assert!(!state.is_trailing_index(0));

    state.items = vec!["A", "B", "C"];
    assert!(!state.is_trailing_index(1));
    assert!(state.is_trailing_index(2));
}

// ============================================================================
// Controller: Admission
// ============================================================================

#[test]
fn test_concurrent_initial_loads_issue_one_fetch() {
    let gate = Arc::new(Semaphore::new(0));
    let fetcher = ScriptedFetcher::new(vec![Ok(PageBatch::new(vec!["A", "B"], 3))])
        .with_gate(ListKind::Popular, gate.clone());
    let controller = PaginationController::new(fetcher);

    let mut first = task::spawn(controller.load_initial(ListId::Popular));
    assert_pending!(first.poll());

    assert_eq!(
        block_on(controller.load_initial(ListId::Popular)),
        LoadOutcome::Skipped
    );
    assert_eq!(
        block_on(controller.load_more(ListId::Popular)),
        LoadOutcome::Skipped
    );

    let snapshot = block_on(controller.snapshot(ListId::Popular));
    assert!(snapshot.is_loading_initial());
    assert!(!snapshot.is_loading_more());

    gate.add_permits(1);
    assert_ready_eq!(first.poll(), LoadOutcome::Loaded { fetched: 2 });
    assert_eq!(controller.fetcher().calls(), vec![(ListKind::Popular, 1)]);
}

#[test]
fn test_lists_load_independently() {
    let gate = Arc::new(Semaphore::new(0));
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["P1"], 1)),
        Ok(PageBatch::new(vec!["N1"], 1)),
    ])
    .with_gate(ListKind::NowPlaying, gate.clone());
    let controller = PaginationController::new(fetcher);

    let mut now_playing = task::spawn(controller.load_initial(ListId::NowPlaying));
    assert_pending!(now_playing.poll());

    assert_eq!(
        block_on(controller.load_initial(ListId::Popular)),
        LoadOutcome::Loaded { fetched: 1 }
    );

    gate.add_permits(1);
    assert_ready_eq!(now_playing.poll(), LoadOutcome::Loaded { fetched: 1 });

    assert_eq!(block_on(controller.snapshot(ListId::Popular)).items, vec!["P1"]);
    assert_eq!(
        block_on(controller.snapshot(ListId::NowPlaying)).items,
        vec!["N1"]
    );
}

#[tokio::test]
async fn test_single_page_list_has_no_more() {
    let fetcher = ScriptedFetcher::new(vec![Ok(PageBatch::new(vec!["A"], 1))]);
    let controller = PaginationController::new(fetcher);

    controller.load_initial(ListId::NowPlaying).await;
    let snapshot = controller.snapshot(ListId::NowPlaying).await;
    assert!(!snapshot.has_more);
    assert_eq!(snapshot.current_page, 1);

    assert_eq!(
        controller.load_more(ListId::NowPlaying).await,
        LoadOutcome::Skipped
    );
    assert_eq!(controller.fetcher().calls().len(), 1);
}

#[tokio::test]
async fn test_initial_load_advances_page() {
    let fetcher = ScriptedFetcher::new(vec![Ok(PageBatch::new(vec!["A", "B"], 3))]);
    let controller = PaginationController::new(fetcher);

    let outcome = controller.load_initial(ListId::NowPlaying).await;
    assert_eq!(outcome, LoadOutcome::Loaded { fetched: 2 });

    let snapshot = controller.snapshot(ListId::NowPlaying).await;
    assert_eq!(snapshot.current_page, 2);
    assert_eq!(snapshot.total_pages, Some(3));
    assert!(snapshot.has_more);
    assert_eq!(snapshot.phase, LoadPhase::Idle);
}

// ============================================================================
// Controller: Merge
// ============================================================================

#[tokio::test]
async fn test_initial_then_load_more_scenario() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["A", "B"], 2)),
        Ok(PageBatch::new(vec!["C"], 2)),
    ]);
    let controller = PaginationController::new(fetcher);

    controller.load_initial(ListId::Popular).await;
    let snapshot = controller.snapshot(ListId::Popular).await;
    assert_eq!(snapshot.items, vec!["A", "B"]);
    assert_eq!(snapshot.current_page, 2);
    assert!(snapshot.has_more);

    controller.load_more(ListId::Popular).await;
    let snapshot = controller.snapshot(ListId::Popular).await;
    assert_eq!(snapshot.items, vec!["A", "B", "C"]);
    assert_eq!(snapshot.current_page, 2);
    assert!(!snapshot.has_more);

    assert_eq!(
        controller.fetcher().calls(),
        vec![(ListKind::Popular, 1), (ListKind::Popular, 2)]
    );
}

#[tokio::test]
async fn test_failed_load_more_retries_same_page() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["A", "B"], 3)),
        Err(server_error()),
        Ok(PageBatch::new(vec!["C", "D"], 3)),
    ]);
    let controller = PaginationController::new(fetcher);

    controller.load_initial(ListId::NowPlaying).await;
    assert_eq!(
        controller.load_more(ListId::NowPlaying).await,
        LoadOutcome::Failed
    );

    let snapshot = controller.snapshot(ListId::NowPlaying).await;
    assert_eq!(snapshot.items, vec!["A", "B"]);
    assert_eq!(snapshot.current_page, 2);
    assert!(snapshot.has_more);
    assert!(!snapshot.is_loading());
    let err = snapshot.last_error.expect("error recorded");
    assert_eq!(err.kind(), ErrorKind::Upstream);

    assert_eq!(
        controller.load_more(ListId::NowPlaying).await,
        LoadOutcome::Loaded { fetched: 2 }
    );
    let snapshot = controller.snapshot(ListId::NowPlaying).await;
    assert_eq!(snapshot.items, vec!["A", "B", "C", "D"]);
    assert_eq!(snapshot.current_page, 3);
    assert!(snapshot.last_error.is_none());

    let pages: Vec<u32> = controller
        .fetcher()
        .calls()
        .into_iter()
        .map(|(_, page)| page)
        .collect();
    assert_eq!(pages, vec![1, 2, 2]);
}

#[tokio::test]
async fn test_reload_replaces_items_from_page_one() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["A"], 5)),
        Ok(PageBatch::new(vec!["B"], 5)),
        Ok(PageBatch::new(vec!["X", "Y"], 5)),
    ]);
    let controller = PaginationController::new(fetcher);

    controller.load_initial(ListId::Popular).await;
    controller.load_more(ListId::Popular).await;
    assert_eq!(controller.snapshot(ListId::Popular).await.current_page, 3);

    controller.load_initial(ListId::Popular).await;
    let snapshot = controller.snapshot(ListId::Popular).await;
    assert_eq!(snapshot.items, vec!["X", "Y"]);
    assert_eq!(snapshot.current_page, 2);
    assert_eq!(controller.fetcher().calls().last(), Some(&(ListKind::Popular, 1)));
}

#[tokio::test]
async fn test_failed_initial_load_keeps_items() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["A", "B"], 5)),
        Ok(PageBatch::new(vec!["C"], 5)),
        Err(Error::Timeout { timeout_ms: 30_000 }),
        Ok(PageBatch::new(vec!["D"], 5)),
    ]);
    let controller = PaginationController::new(fetcher);

    controller.load_initial(ListId::NowPlaying).await;
    controller.load_more(ListId::NowPlaying).await;
    assert_eq!(
        controller.load_initial(ListId::NowPlaying).await,
        LoadOutcome::Failed
    );

    let snapshot = controller.snapshot(ListId::NowPlaying).await;
    assert_eq!(snapshot.items, vec!["A", "B", "C"]);
    assert_eq!(snapshot.current_page, 3);
    assert!(snapshot.has_more);
    assert_eq!(snapshot.phase, LoadPhase::Idle);
    assert_eq!(
        snapshot.last_error.map(|e| e.kind()),
        Some(ErrorKind::Network)
    );

    assert_eq!(
        controller.load_more(ListId::NowPlaying).await,
        LoadOutcome::Loaded { fetched: 1 }
    );
    let snapshot = controller.snapshot(ListId::NowPlaying).await;
    assert_eq!(snapshot.items, vec!["A", "B", "C", "D"]);
    assert_eq!(snapshot.current_page, 4);
    assert_eq!(
        controller.fetcher().calls(),
        vec![
            (ListKind::NowPlaying, 1),
            (ListKind::NowPlaying, 2),
            (ListKind::NowPlaying, 1),
            (ListKind::NowPlaying, 3),
        ]
    );
}

#[test]
fn test_reload_rewinds_page_while_in_flight() {
    let gate = Arc::new(Semaphore::new(1));
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["A"], 4)),
        Err(server_error()),
    ])
    .with_gate(ListKind::Popular, gate.clone());
    let controller = PaginationController::new(fetcher);

    block_on(controller.load_initial(ListId::Popular));
    let mut reload = task::spawn(controller.load_initial(ListId::Popular));
    assert_pending!(reload.poll());

    let in_flight = block_on(controller.snapshot(ListId::Popular));
    assert_eq!(in_flight.current_page, 1);
    assert!(in_flight.is_loading_initial());

    gate.add_permits(1);
    assert_ready_eq!(reload.poll(), LoadOutcome::Failed);
    assert_eq!(block_on(controller.snapshot(ListId::Popular)).current_page, 2);
}

#[tokio::test]
async fn test_load_more_if_trailing() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["A", "B", "C"], 2)),
        Ok(PageBatch::new(vec!["D"], 2)),
    ]);
    let controller = PaginationController::new(fetcher);

    controller.load_initial(ListId::Popular).await;

    assert_eq!(
        controller.load_more_if_trailing(ListId::Popular, 1).await,
        LoadOutcome::Skipped
    );
    assert_eq!(controller.fetcher().calls().len(), 1);

    assert_eq!(
        controller.load_more_if_trailing(ListId::Popular, 2).await,
        LoadOutcome::Loaded { fetched: 1 }
    );
    assert_eq!(
        controller.snapshot(ListId::Popular).await.items,
        vec!["A", "B", "C", "D"]
    );
}

// ============================================================================
// Controller: Events
// ============================================================================

#[tokio::test]
async fn test_events_follow_transitions() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["A"], 1)),
        Err(server_error()),
    ]);
    let controller = PaginationController::new(fetcher);
    let mut events = controller.subscribe();

    controller.load_initial(ListId::NowPlaying).await;
    assert_eq!(
        events.try_recv().unwrap(),
        ListEvent::Started(ListId::NowPlaying, LoadPhase::LoadingInitial)
    );
    assert_eq!(events.try_recv().unwrap(), ListEvent::Updated(ListId::NowPlaying));

    // No more pages: skipped triggers are silent
    controller.load_more(ListId::NowPlaying).await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    controller.load_initial(ListId::NowPlaying).await;
    assert_eq!(
        events.try_recv().unwrap(),
        ListEvent::Started(ListId::NowPlaying, LoadPhase::LoadingInitial)
    );
    assert_eq!(events.try_recv().unwrap(), ListEvent::Failed(ListId::NowPlaying));
}

// ============================================================================
// Controller: Search
// ============================================================================

#[test]
fn test_empty_search_clears_without_fetch() {
    let fetcher = ScriptedFetcher::new(vec![Ok(PageBatch::new(vec!["Alien"], 1))]);
    let controller = PaginationController::new(fetcher);

    assert!(block_on(controller.search("alien")).is_loaded());
    assert_eq!(block_on(controller.search_snapshot()).results, vec!["Alien"]);

    // Completes on first poll: nothing to wait for
    let mut clear = task::spawn(controller.search(""));
    assert_ready_eq!(clear.poll(), LoadOutcome::Cleared);

    let snapshot = block_on(controller.search_snapshot());
    assert!(snapshot.results.is_empty());
    assert_eq!(snapshot.query, "");
    assert_eq!(controller.fetcher().calls().len(), 1);
}

#[tokio::test]
async fn test_search_replaces_results_and_ignores_paging() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["Alien", "Aliens"], 9)),
        Ok(PageBatch::new(vec!["Heat"], 4)),
    ]);
    let controller = PaginationController::new(fetcher);

    controller.search("alien").await;
    controller.search("heat").await;

    let snapshot = controller.search_snapshot().await;
    assert_eq!(snapshot.results, vec!["Heat"]);
    assert_eq!(snapshot.query, "heat");
    assert_eq!(
        controller.fetcher().calls(),
        vec![
            (ListKind::Search("alien".to_string()), 1),
            (ListKind::Search("heat".to_string()), 1),
        ]
    );

    // Paged lists are untouched by search
    let popular = controller.snapshot(ListId::Popular).await;
    assert!(popular.items.is_empty());
    assert_eq!(popular.current_page, 1);
}

#[tokio::test]
async fn test_search_failure_keeps_previous_results() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(PageBatch::new(vec!["Alien"], 1)),
        Err(Error::decode("/search/movie", "expected `results`")),
    ]);
    let controller = PaginationController::new(fetcher);
    let mut events = controller.subscribe();

    controller.search("alien").await;
    assert_eq!(controller.search("heat").await, LoadOutcome::Failed);

    let snapshot = controller.search_snapshot().await;
    assert_eq!(snapshot.results, vec!["Alien"]);
    assert_eq!(
        snapshot.last_error.map(|e| e.kind()),
        Some(ErrorKind::Decode)
    );
    assert_eq!(events.try_recv().unwrap(), ListEvent::SearchUpdated);
    assert_eq!(events.try_recv().unwrap(), ListEvent::SearchFailed);
}

#[test]
fn test_stale_search_completion_is_discarded() {
    let slow = Arc::new(Semaphore::new(0));
    let fast = Arc::new(Semaphore::new(0));
    let fetcher = ScriptedFetcher::new(Vec::new())
        .with_response(
            ListKind::Search("al".to_string()),
            Ok(PageBatch::new(vec!["Aladdin"], 1)),
        )
        .with_response(
            ListKind::Search("alien".to_string()),
            Ok(PageBatch::new(vec!["Alien", "Aliens"], 1)),
        )
        .with_gate(ListKind::Search("al".to_string()), slow.clone())
    .with_gate(ListKind::Search("alien".to_string()), fast.clone());
    let controller = PaginationController::new(fetcher);

    let mut first = task::spawn(controller.search("al"));
    assert_pending!(first.poll());
    let mut second = task::spawn(controller.search("alien"));
    assert_pending!(second.poll());
    assert!(block_on(controller.search_snapshot()).is_searching());

    fast.add_permits(1);
    assert_ready_eq!(second.poll(), LoadOutcome::Loaded { fetched: 2 });

    slow.add_permits(1);
    assert_ready_eq!(first.poll(), LoadOutcome::Superseded);

    let snapshot = block_on(controller.search_snapshot());
    assert_eq!(snapshot.results, vec!["Alien", "Aliens"]);
    assert_eq!(snapshot.query, "alien");
    assert!(!snapshot.is_searching());
    assert_eq!(controller.fetcher().calls().len(), 2);
}

#[test]
fn test_dropped_search_is_not_counted_as_searching() {
    let gate = Arc::new(Semaphore::new(0));
    let fetcher = ScriptedFetcher::new(Vec::new())
        .with_gate(ListKind::Search("x".to_string()), gate);
    let controller = PaginationController::new(fetcher);

    let mut pending = task::spawn(controller.search("x"));
    assert_pending!(pending.poll());
    assert!(block_on(controller.search_snapshot()).is_searching());
    drop(pending);

    assert_eq!(block_on(controller.search("")), LoadOutcome::Cleared);
    let snapshot = block_on(controller.search_snapshot());
    assert!(!snapshot.is_searching());
    assert!(snapshot.results.is_empty());
}
