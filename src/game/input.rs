//! Parsing of the two boundary events as they arrive from a text transport.
//!
//! Anything rejected here is an input error: it is reported back to the user and
//! never reaches the engine.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::Serialize;

const WINS_SUFFIX: &str = " wins";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("expected a positive number of players, got {0:?}")]
    InvalidPlayerCount(String),
    #[error("expected '<name> wins'")]
    MissingWinner,
}

/// Number of players at the table; always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerCount(NonZeroU32);

impl PlayerCount {
    pub fn new(count: u32) -> Option<Self> {
        NonZeroU32::new(count).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl FromStr for PlayerCount {
    type Err = InputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InputError::InvalidPlayerCount(trimmed.to_string()))
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A declared winner, read from `"<name> wins"` or a bare name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinnerDeclaration {
    name: String,
}

impl WinnerDeclaration {
    pub fn from_line(line: &str) -> Result<Self, InputError> {
        let line = line.trim_end();
        let name = line.strip_suffix(WINS_SUFFIX).unwrap_or(line).trim();
        if name.is_empty() {
            return Err(InputError::MissingWinner);
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_name(self) -> String {
        self.name
    }
}
