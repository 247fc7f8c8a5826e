use crate::store::StoreError;

/// Events that arrived in an order the hand lifecycle does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("a hand is already running")]
    HandInProgress,
    #[error("no hand is running")]
    NoRunningHand,
    #[error("hand already finished; win for {winner} has not been committed")]
    WinPending { winner: String },
    #[error("no finished hand is waiting to be committed")]
    NothingToCommit,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("failed to record win for {winner}: {source}")]
    Persistence {
        winner: String,
        #[source]
        source: StoreError,
    },
}

impl GameError {
    pub fn protocol(&self) -> Option<&ProtocolError> {
        match self {
            GameError::Protocol(err) => Some(err),
            GameError::Persistence { .. } => None,
        }
    }
}
