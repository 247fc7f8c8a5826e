use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::league::{League, Player};

use super::{decode_records, score_in, with_win, PlayerStore, StoreError};

const LOG_TARGET: &str = "poker_league::store::file_system";

/// Player store backed by a single JSON file.
///
/// The file holds an array of `{name, wins}` records. Each recorded win rewrites
/// the whole file through a sibling temporary file that is renamed into place, so
/// a shorter document never inherits bytes from a longer one.
pub struct FileSystemPlayerStore {
    path: PathBuf,
    records: Mutex<Vec<Player>>,
}

impl FileSystemPlayerStore {
    /// Load the store at `path`. A missing or empty file is an empty league.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(target = LOG_TARGET, path = %path.display(), "store file missing, starting empty");
                String::new()
            }
            Err(source) => return Err(StoreError::Unavailable { path, source }),
        };

        let records = decode_records(&raw)?;
        info!(
            target = LOG_TARGET,
            path = %path.display(),
            players = records.len(),
            "opened player store"
        );

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[Player]) -> Result<(), StoreError> {
        let payload =
            serde_json::to_vec_pretty(records).map_err(|err| StoreError::PersistenceFailed {
                path: self.path.clone(),
                source: err.into(),
            })?;
        let tmp_path = self.temp_path();

        let written = File::create(&tmp_path)
            .and_then(|mut file| {
                file.write_all(&payload)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&tmp_path, &self.path));

        written.map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::PersistenceFailed {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "league".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()))
    }
}

impl PlayerStore for FileSystemPlayerStore {
    fn league(&self) -> League {
        League::rank(self.records.lock().iter().cloned())
    }

    fn score(&self, name: &str) -> u64 {
        score_in(&self.records.lock(), name)
    }

    fn record_win(&self, name: &str) -> Result<u64, StoreError> {
        let mut records = self.records.lock();
        let (next, wins) = with_win(&records, name);

        if let Err(err) = self.persist(&next) {
            warn!(target = LOG_TARGET, player = %name, error = %err, "failed to record win");
            return Err(err);
        }

        *records = next;
        debug!(target = LOG_TARGET, player = %name, wins, "recorded win");
        Ok(wins)
    }
}
