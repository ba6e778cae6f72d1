//! Integration tests for Store topic segregation
//!
//! Snapshot subscribers and action observers run as separate tasks, the way a
//! render loop and an event log would.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::time::Duration;
use todolist_core::reducer::Reducer;
use todolist_runtime::{Store, StoreError};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
struct Board {
    pins: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
enum BoardAction {
    Pin(&'static str),
    Unpin(&'static str),
}

struct BoardReducer;

impl Reducer for BoardReducer {
    type State = Board;
    type Action = BoardAction;
    type Environment = ();

    fn reduce(&self, state: &mut Board, action: BoardAction, _env: &()) {
        match action {
            BoardAction::Pin(note) => state.pins.push(note),
            BoardAction::Unpin(note) => state.pins.retain(|pin| *pin != note),
        }
    }
}

fn board_store() -> Store<Board, BoardAction, (), BoardReducer> {
    Store::new(Board::default(), BoardReducer, ())
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn render_loop_sees_each_change() {
    let store = board_store();
    let mut subscription = store.subscribe();

    let render = tokio::spawn(async move {
        let mut frames = Vec::new();
        while let Ok(snapshot) = subscription.changed().await {
            frames.push(snapshot.pins.len());
            if snapshot.pins.len() == 2 {
                break;
            }
        }
        frames
    });

    store.send(BoardAction::Pin("milk")).unwrap();
    tokio::task::yield_now().await;
    store.send(BoardAction::Unpin("nothing")).unwrap();
    tokio::task::yield_now().await;
    store.send(BoardAction::Pin("bread")).unwrap();

    let frames = tokio::time::timeout(Duration::from_secs(1), render)
        .await
        .expect("render loop finished")
        .unwrap();

    // A render may coalesce snapshots, but never observes the no-op
    assert_eq!(frames.last(), Some(&2));
    assert!(frames.iter().all(|len| *len >= 1));
}

#[tokio::test]
async fn action_log_sees_every_accepted_action() {
    let store = board_store();
    let mut actions = store.subscribe_actions();

    store.send(BoardAction::Pin("milk")).unwrap();
    store.send(BoardAction::Unpin("nothing")).unwrap();

    assert_eq!(actions.recv().await.unwrap(), BoardAction::Pin("milk"));
    assert_eq!(actions.recv().await.unwrap(), BoardAction::Unpin("nothing"));
}

#[tokio::test]
async fn render_loop_stops_when_store_is_dropped() {
    let store = board_store();
    let mut subscription = store.subscribe();

    let render = tokio::spawn(async move { subscription.changed().await });
    drop(store);

    let result = tokio::time::timeout(Duration::from_secs(1), render)
        .await
        .expect("render loop finished")
        .unwrap();
    assert_eq!(result.unwrap_err(), StoreError::SessionEnded);
}
