#![cfg(test)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::engine::{Game, GameEngine, HandStatus};
use super::errors::{GameError, ProtocolError};
use super::input::PlayerCount;
use crate::blinds::{BlindStructure, ScheduledAlert};
use crate::league::League;
use crate::sink::GameMessage;
use crate::store::{InMemoryPlayerStore, PlayerStore, SharedPlayerStore, StoreError};

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

fn players(n: u32) -> PlayerCount {
    PlayerCount::new(n).unwrap()
}

fn three_levels() -> BlindStructure {
    BlindStructure::new(vec![
        ScheduledAlert::new(minutes(0), 100),
        ScheduledAlert::new(minutes(10), 200),
        ScheduledAlert::new(minutes(20), 300),
    ])
}

fn late_levels() -> BlindStructure {
    BlindStructure::new(vec![
        ScheduledAlert::new(minutes(5), 100),
        ScheduledAlert::new(minutes(10), 200),
    ])
}

/// Store that records calls and can be told to fail writes.
#[derive(Default)]
struct SpyStore {
    win_calls: Mutex<Vec<String>>,
    fail_writes: Mutex<bool>,
    inner: InMemoryPlayerStore,
}

impl SpyStore {
    fn win_calls(&self) -> Vec<String> {
        self.win_calls.lock().clone()
    }

    fn set_failing(&self, failing: bool) {
        *self.fail_writes.lock() = failing;
    }
}

impl PlayerStore for SpyStore {
    fn league(&self) -> League {
        self.inner.league()
    }

    fn score(&self, name: &str) -> u64 {
        self.inner.score(name)
    }

    fn record_win(&self, name: &str) -> Result<u64, StoreError> {
        self.win_calls.lock().push(name.to_string());
        if *self.fail_writes.lock() {
            return Err(StoreError::PersistenceFailed {
                path: "spy.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.inner.record_win(name)
    }
}

fn engine_with_spy(blinds: BlindStructure) -> (GameEngine, Arc<SpyStore>) {
    let spy = Arc::new(SpyStore::default());
    let store: SharedPlayerStore = spy.clone();
    (GameEngine::new(store, blinds), spy)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<GameMessage>) -> Vec<GameMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

#[tokio::test(start_paused = true)]
async fn start_schedules_the_configured_blinds_in_order() {
    let (engine, _spy) = engine_with_spy(three_levels());
    let (tx, mut rx) = mpsc::unbounded_channel::<GameMessage>();
    let started = Instant::now();

    engine.start(players(3), Arc::new(tx)).unwrap();
    assert_eq!(engine.status(), HandStatus::Running);

    for (offset, amount) in [(minutes(0), 100), (minutes(10), 200), (minutes(20), 300)] {
        assert_eq!(rx.recv().await, Some(GameMessage::BlindChanged { amount }));
        assert!(Instant::now() >= started + offset);
    }
}

#[tokio::test(start_paused = true)]
async fn finish_before_first_alert_delivers_no_alerts() {
    let (engine, spy) = engine_with_spy(late_levels());
    let (tx, mut rx) = mpsc::unbounded_channel::<GameMessage>();

    engine.start(players(4), Arc::new(tx)).unwrap();
    let result = engine.finish("Ruth").unwrap();
    assert_eq!(result.winner, "Ruth");
    assert_eq!(result.wins, 1);

    tokio::time::sleep(minutes(60)).await;
    let messages = drain(&mut rx);
    assert_eq!(
        messages,
        vec![GameMessage::WinRecorded {
            name: "Ruth".into(),
            wins: 1
        }]
    );
    assert_eq!(spy.win_calls(), vec!["Ruth".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn finish_mid_hand_stops_later_alerts() {
    let (engine, _spy) = engine_with_spy(three_levels());
    let (tx, mut rx) = mpsc::unbounded_channel::<GameMessage>();

    engine.start(players(2), Arc::new(tx)).unwrap();
    assert_eq!(rx.recv().await, Some(GameMessage::BlindChanged { amount: 100 }));
    tokio::time::sleep(minutes(12)).await;
    engine.finish("Cleo").unwrap();

    tokio::time::sleep(minutes(60)).await;
    let amounts: Vec<u64> = drain(&mut rx)
        .into_iter()
        .filter_map(|message| match message {
            GameMessage::BlindChanged { amount } => Some(amount),
            GameMessage::WinRecorded { .. } => None,
        })
        .collect();
    assert_eq!(amounts, vec![200]);
}

#[tokio::test]
async fn finish_without_start_is_rejected() {
    let (engine, spy) = engine_with_spy(three_levels());
    let err = engine.finish("X").unwrap_err();
    assert_eq!(err.protocol(), Some(&ProtocolError::NoRunningHand));
    assert!(spy.win_calls().is_empty());
    assert_eq!(engine.status(), HandStatus::NotStarted);
}

#[tokio::test(start_paused = true)]
async fn second_start_is_rejected_without_rescheduling() {
    let (engine, _spy) = engine_with_spy(late_levels());
    let (first_tx, mut first_rx) = mpsc::unbounded_channel::<GameMessage>();
    let (second_tx, mut second_rx) = mpsc::unbounded_channel::<GameMessage>();

    let hand = engine.start(players(3), Arc::new(first_tx)).unwrap();
    let err = engine.start(players(5), Arc::new(second_tx)).unwrap_err();
    assert_eq!(err.protocol(), Some(&ProtocolError::HandInProgress));

    let current = engine.current_hand().unwrap();
    assert_eq!(current.hand_id, hand);
    assert_eq!(current.player_count.get(), 3);

    tokio::time::sleep(minutes(11)).await;
    assert_eq!(drain(&mut first_rx).len(), 2);
    assert!(second_rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn double_finish_records_a_single_win() {
    let (engine, spy) = engine_with_spy(late_levels());
    let (tx, _rx) = mpsc::unbounded_channel::<GameMessage>();

    engine.start(players(2), Arc::new(tx)).unwrap();
    engine.finish("Pepper").unwrap();
    let err = engine.finish("Pepper").unwrap_err();

    assert_eq!(err.protocol(), Some(&ProtocolError::NoRunningHand));
    assert_eq!(spy.win_calls(), vec!["Pepper".to_string()]);
    assert_eq!(spy.score("Pepper"), 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_hands_accumulate_wins() {
    let (engine, spy) = engine_with_spy(three_levels());

    for expected in 1..=3 {
        let (tx, _rx) = mpsc::unbounded_channel::<GameMessage>();
        engine.start(players(1), Arc::new(tx)).unwrap();
        let result = engine.finish("Pepper").unwrap();
        assert_eq!(result.wins, expected);
    }

    assert_eq!(spy.score("Pepper"), 3);
    let league = spy.league();
    assert_eq!(league.len(), 1);
    assert_eq!(league.score("Pepper"), 3);
}

#[tokio::test(start_paused = true)]
async fn persistence_failure_keeps_hand_for_retry() {
    let (engine, spy) = engine_with_spy(late_levels());
    let (tx, mut rx) = mpsc::unbounded_channel::<GameMessage>();

    engine.start(players(3), Arc::new(tx)).unwrap();
    spy.set_failing(true);

    let err = engine.finish("Chris").unwrap_err();
    assert!(matches!(err, GameError::Persistence { ref winner, .. } if winner == "Chris"));
    assert_eq!(engine.status(), HandStatus::Finished);

    // the hand is over: no alerts and no second declaration
    tokio::time::sleep(minutes(30)).await;
    assert!(drain(&mut rx).is_empty());
    assert!(matches!(
        engine.finish("Cleo").unwrap_err().protocol(),
        Some(ProtocolError::WinPending { .. })
    ));

    // a new hand cannot open while the pending win still fails to persist
    let (other_tx, mut other_rx) = mpsc::unbounded_channel::<GameMessage>();
    let err = engine.start(players(2), Arc::new(other_tx)).unwrap_err();
    assert!(matches!(err, GameError::Persistence { ref winner, .. } if winner == "Chris"));
    assert_eq!(engine.status(), HandStatus::Finished);
    tokio::time::sleep(minutes(30)).await;
    assert!(other_rx.recv().await.is_none());

    spy.set_failing(false);
    let result = engine.retry_commit().unwrap();
    assert_eq!(result.winner, "Chris");
    assert_eq!(spy.score("Chris"), 1);
    assert_eq!(engine.status(), HandStatus::NotStarted);
    assert_eq!(
        drain(&mut rx),
        vec![GameMessage::WinRecorded {
            name: "Chris".into(),
            wins: 1
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn next_start_commits_the_pending_win_once_the_store_recovers() {
    let (engine, spy) = engine_with_spy(three_levels());
    let (tx, _rx) = mpsc::unbounded_channel::<GameMessage>();

    engine.start(players(3), Arc::new(tx)).unwrap();
    spy.set_failing(true);
    engine.finish("Ruth").unwrap_err();
    spy.set_failing(false);

    let (next_tx, mut next_rx) = mpsc::unbounded_channel::<GameMessage>();
    engine.start(players(2), Arc::new(next_tx)).unwrap();

    assert_eq!(engine.status(), HandStatus::Running);
    assert_eq!(spy.score("Ruth"), 1);
    assert_eq!(spy.win_calls(), vec!["Ruth".to_string(), "Ruth".to_string()]);
    assert_eq!(next_rx.recv().await, Some(GameMessage::BlindChanged { amount: 100 }));

    engine.finish("Cleo").unwrap();
    assert_eq!(spy.score("Ruth"), 1);
    assert_eq!(spy.score("Cleo"), 1);
}

#[tokio::test]
async fn retry_without_pending_win_is_rejected() {
    let (engine, spy) = engine_with_spy(late_levels());
    assert_eq!(
        engine.retry_commit().unwrap_err().protocol(),
        Some(&ProtocolError::NothingToCommit)
    );
    assert!(spy.win_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn abandon_cancels_alerts_without_recording() {
    let (engine, spy) = engine_with_spy(late_levels());
    let (tx, mut rx) = mpsc::unbounded_channel::<GameMessage>();

    assert!(!engine.abandon());
    engine.start(players(3), Arc::new(tx)).unwrap();
    assert!(engine.abandon());
    assert_eq!(engine.status(), HandStatus::NotStarted);

    tokio::time::sleep(minutes(30)).await;
    assert!(rx.recv().await.is_none());
    assert!(spy.win_calls().is_empty());
}
