use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("malformed player store: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("malformed player store: duplicate record for {0:?}")]
    DuplicatePlayer(String),
    #[error("player store {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to persist player store {path}: {source}")]
    PersistenceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Content could not be decoded; no safe league can be inferred from it.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::DuplicatePlayer(_))
    }

    /// A write failed; the previous league is intact and the write may be retried.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::PersistenceFailed { .. })
    }
}
