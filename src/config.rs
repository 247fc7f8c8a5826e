//! Settings shared by the command-line and server binaries.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::blinds::{BlindStructure, BlindStructureError};
use crate::store::{FileSystemPlayerStore, InMemoryPlayerStore, SharedPlayerStore, StoreError};

pub const DEFAULT_STORE_PATH: &str = "game.db.json";
pub const DEFAULT_BLIND_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_BLIND_AMOUNTS: &str = "100,200,300,400,500,600,800,1000,2000,4000,8000";

#[derive(Debug, Clone, clap::Args)]
pub struct LeagueArgs {
    /// JSON file holding the league
    #[arg(long, env = "POKER_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Seconds between blind increases
    #[arg(long, env = "POKER_BLIND_INTERVAL_SECS", default_value_t = DEFAULT_BLIND_INTERVAL_SECS)]
    pub blind_interval_secs: u64,

    /// Comma separated blind amounts, in the order they apply
    #[arg(long, env = "POKER_BLIND_AMOUNTS", default_value = DEFAULT_BLIND_AMOUNTS)]
    pub blind_amounts: String,

    /// Toggle structured (JSON) logs
    #[arg(long, env = "POKER_LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl LeagueArgs {
    pub fn blind_structure(&self) -> Result<BlindStructure, BlindStructureError> {
        let amounts = BlindStructure::parse_amounts(&self.blind_amounts)?;
        Ok(BlindStructure::uniform(
            Duration::from_secs(self.blind_interval_secs),
            &amounts,
        ))
    }

    pub fn open_file_store(&self) -> Result<SharedPlayerStore, StoreError> {
        Ok(Arc::new(FileSystemPlayerStore::open(&self.store)?))
    }

    pub fn open_store(&self, in_memory: bool) -> Result<SharedPlayerStore, StoreError> {
        if in_memory {
            return Ok(Arc::new(InMemoryPlayerStore::new()));
        }
        self.open_file_store()
    }
}
