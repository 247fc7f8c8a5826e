//! Durable win-count storage.
//!
//! Every store keeps its records in insertion order and ranks them on read, so
//! two reads with no write in between always return the same league. Wins are
//! accumulated through [`PlayerStore::record_win`], which holds the store's lock
//! across the whole read-modify-write cycle.

use std::collections::HashSet;
use std::sync::Arc;

use crate::league::{parse_players, League, Player};

pub mod error;
pub mod file_system;
pub mod in_memory;

pub use error::StoreError;
pub use file_system::FileSystemPlayerStore;
pub use in_memory::InMemoryPlayerStore;

pub trait PlayerStore: Send + Sync {
    /// The full league, ranked from the current persisted state.
    fn league(&self) -> League;

    /// Wins recorded for `name`, 0 when absent.
    fn score(&self, name: &str) -> u64;

    /// Add one win for `name`, inserting the player if needed. Returns the new total.
    fn record_win(&self, name: &str) -> Result<u64, StoreError>;
}

pub type SharedPlayerStore = Arc<dyn PlayerStore>;

pub(crate) fn decode_records(raw: &str) -> Result<Vec<Player>, StoreError> {
    let records = parse_players(raw)?;
    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.name.as_str()) {
            return Err(StoreError::DuplicatePlayer(record.name.clone()));
        }
    }
    Ok(records)
}

/// Copy of `records` with one more win for `name`, and that player's new total.
pub(crate) fn with_win(records: &[Player], name: &str) -> (Vec<Player>, u64) {
    let mut next = records.to_vec();
    let wins = match next.iter_mut().find(|player| player.name == name) {
        Some(player) => {
            player.wins += 1;
            player.wins
        }
        None => {
            next.push(Player::new(name, 1));
            1
        }
    };
    (next, wins)
}

pub(crate) fn score_in(records: &[Player], name: &str) -> u64 {
    records
        .iter()
        .find(|player| player.name == name)
        .map(|player| player.wins)
        .unwrap_or(0)
}
