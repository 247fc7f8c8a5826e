use parking_lot::Mutex;
use tracing::debug;

use crate::league::{League, Player};

use super::{decode_records, score_in, with_win, PlayerStore, StoreError};

const LOG_TARGET: &str = "poker_league::store::in_memory";

/// Volatile player store with the same ranking and locking rules as the file store.
#[derive(Default)]
pub struct InMemoryPlayerStore {
    records: Mutex<Vec<Player>>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_players(players: impl IntoIterator<Item = Player>) -> Result<Self, StoreError> {
        let players: Vec<Player> = players.into_iter().collect();
        let raw = serde_json::to_string(&players)?;
        Self::from_json(&raw)
    }

    /// Seed from serialized records; empty input is an empty store.
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        Ok(Self {
            records: Mutex::new(decode_records(raw)?),
        })
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn league(&self) -> League {
        League::rank(self.records.lock().iter().cloned())
    }

    fn score(&self, name: &str) -> u64 {
        score_in(&self.records.lock(), name)
    }

    fn record_win(&self, name: &str) -> Result<u64, StoreError> {
        let mut records = self.records.lock();
        let (next, wins) = with_win(&records, name);
        *records = next;
        debug!(target = LOG_TARGET, player = %name, wins, "recorded win");
        Ok(wins)
    }
}
