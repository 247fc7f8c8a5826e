use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::blinds::{schedule_blinds, BlindStructure, ScheduledBlinds};
use crate::sink::{GameMessage, SharedSink};
use crate::store::SharedPlayerStore;

use super::errors::{GameError, ProtocolError};
use super::input::PlayerCount;

const LOG_TARGET: &str = "poker_league::game::engine";

pub type HandId = Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HandStatus {
    NotStarted,
    Running,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HandResult {
    pub hand_id: HandId,
    pub winner: String,
    pub wins: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HandSummary {
    pub hand_id: HandId,
    pub player_count: PlayerCount,
    pub status: HandStatus,
    pub winner: Option<String>,
}

/// The two inbound events of a hand, as seen by a transport.
pub trait Game: Send + Sync {
    /// Begin a hand. Blind alerts go to `sink` in the background; this returns
    /// immediately. A win left uncommitted by the previous hand is recorded
    /// first, and the new hand only opens once that succeeds.
    fn start(&self, players: PlayerCount, sink: SharedSink) -> Result<HandId, GameError>;

    /// Declare the winner of the running hand and record the win.
    fn finish(&self, winner: &str) -> Result<HandResult, GameError>;

    /// Record the win of a hand whose `finish` failed to persist.
    fn retry_commit(&self) -> Result<HandResult, GameError>;

    /// Drop a running hand without recording anything. Returns false if no hand
    /// was running.
    fn abandon(&self) -> bool;
}

struct GameSession {
    id: HandId,
    player_count: PlayerCount,
    status: HandStatus,
    winner: Option<String>,
    sink: SharedSink,
    blinds: ScheduledBlinds,
}

impl GameSession {
    fn summary(&self) -> HandSummary {
        HandSummary {
            hand_id: self.id,
            player_count: self.player_count,
            status: self.status,
            winner: self.winner.clone(),
        }
    }
}

/// Drives one hand at a time from start to a committed win.
///
/// The session slot is the only mutable state; every transition happens under
/// its lock, so duplicate or out-of-order events are rejected before they can
/// touch the scheduler or the store.
pub struct GameEngine {
    store: SharedPlayerStore,
    blinds: BlindStructure,
    session: Mutex<Option<GameSession>>,
}

impl GameEngine {
    pub fn new(store: SharedPlayerStore, blinds: BlindStructure) -> Self {
        Self {
            store,
            blinds,
            session: Mutex::new(None),
        }
    }

    pub fn status(&self) -> HandStatus {
        self.session
            .lock()
            .as_ref()
            .map_or(HandStatus::NotStarted, |session| session.status)
    }

    pub fn current_hand(&self) -> Option<HandSummary> {
        self.session.lock().as_ref().map(GameSession::summary)
    }

    /// Record the pending win and discard the session. On failure the session
    /// stays `Finished` so the same win can be retried.
    fn commit(&self, slot: &mut Option<GameSession>) -> Result<HandResult, GameError> {
        let Some((hand_id, winner)) = slot
            .as_ref()
            .and_then(|session| Some((session.id, session.winner.clone()?)))
        else {
            return Err(ProtocolError::NothingToCommit.into());
        };

        let wins = self.store.record_win(&winner).map_err(|source| {
            warn!(
                target = LOG_TARGET,
                %hand_id,
                winner = %winner,
                error = %source,
                "failed to record win; hand kept for retry"
            );
            GameError::Persistence {
                winner: winner.clone(),
                source,
            }
        })?;

        if let Some(session) = slot.take() {
            let message = GameMessage::WinRecorded {
                name: winner.clone(),
                wins,
            };
            if let Err(err) = session.sink.deliver(message) {
                warn!(target = LOG_TARGET, %hand_id, error = %err, "failed to deliver win confirmation");
            }
        }

        info!(target = LOG_TARGET, %hand_id, winner = %winner, wins, "hand committed");
        Ok(HandResult {
            hand_id,
            winner,
            wins,
        })
    }
}

impl Game for GameEngine {
    fn start(&self, players: PlayerCount, sink: SharedSink) -> Result<HandId, GameError> {
        let mut slot = self.session.lock();
        match slot.as_ref().map(|session| session.status) {
            Some(HandStatus::Finished) => {
                let committed = self.commit(&mut slot)?;
                info!(
                    target = LOG_TARGET,
                    hand_id = %committed.hand_id,
                    winner = %committed.winner,
                    "pending win committed before new hand"
                );
            }
            Some(_) => return Err(ProtocolError::HandInProgress.into()),
            None => {}
        }

        let id = Uuid::new_v4();
        let blinds = schedule_blinds(Instant::now(), &self.blinds, sink.clone());
        *slot = Some(GameSession {
            id,
            player_count: players,
            status: HandStatus::Running,
            winner: None,
            sink,
            blinds,
        });

        info!(
            target = LOG_TARGET,
            hand_id = %id,
            players = players.get(),
            alerts = self.blinds.len(),
            "hand started"
        );
        Ok(id)
    }

    fn finish(&self, winner: &str) -> Result<HandResult, GameError> {
        let mut slot = self.session.lock();
        let session = slot.as_mut().ok_or(ProtocolError::NoRunningHand)?;
        if let Some(pending) = &session.winner {
            return Err(ProtocolError::WinPending {
                winner: pending.clone(),
            }
            .into());
        }

        session.blinds.cancel();
        session.status = HandStatus::Finished;
        session.winner = Some(winner.to_string());
        info!(target = LOG_TARGET, hand_id = %session.id, winner = %winner, "hand finished");

        self.commit(&mut slot)
    }

    fn retry_commit(&self) -> Result<HandResult, GameError> {
        let mut slot = self.session.lock();
        match slot.as_ref().map(|session| session.status) {
            Some(HandStatus::Finished) => self.commit(&mut slot),
            _ => Err(ProtocolError::NothingToCommit.into()),
        }
    }

    fn abandon(&self) -> bool {
        let mut slot = self.session.lock();
        match slot.as_ref().map(|session| session.status) {
            Some(HandStatus::Running) => {
                if let Some(mut session) = slot.take() {
                    session.blinds.cancel();
                    info!(target = LOG_TARGET, hand_id = %session.id, "hand abandoned");
                }
                true
            }
            _ => false,
        }
    }
}
