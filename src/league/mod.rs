//! League table model: player win counts and their ranking.

use serde::{Deserialize, Serialize};

/// A single player's record. `name` is the natural key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Wins")]
    pub wins: u64,
}

impl Player {
    pub fn new(name: impl Into<String>, wins: u64) -> Self {
        Self {
            name: name.into(),
            wins,
        }
    }
}

/// Players ranked by wins, highest first.
///
/// A `League` is always derived from an unordered collection through
/// [`League::rank`]; players with equal wins keep their insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct League {
    players: Vec<Player>,
}

impl League {
    pub fn rank(players: impl IntoIterator<Item = Player>) -> Self {
        let mut players: Vec<Player> = players.into_iter().collect();
        // sort_by is stable, ties keep insertion order
        players.sort_by(|a, b| b.wins.cmp(&a.wins));
        Self { players }
    }

    /// Wins recorded for `name`, or 0 when the player is unknown.
    pub fn score(&self, name: &str) -> u64 {
        self.find(name).map(|player| player.wins).unwrap_or(0)
    }

    pub fn find(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn into_players(self) -> Vec<Player> {
        self.players
    }

    /// Parse a serialized league. Empty (or whitespace-only) input is an empty league.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        parse_players(raw).map(Self::rank)
    }
}

impl<'a> IntoIterator for &'a League {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

/// Decode persisted records in their stored order.
pub(crate) fn parse_players(raw: &str) -> Result<Vec<Player>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}
