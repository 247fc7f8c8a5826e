//! Line-oriented front end: one prompt, one player count, one winner line.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tracing::{debug, warn};

use crate::game::{Game, GameError, HandResult, PlayerCount, WinnerDeclaration};
use crate::sink::{SharedSink, TextSink};

const LOG_TARGET: &str = "poker_league::cli";

pub const PLAYER_PROMPT: &str = "Please enter the number of players: ";
pub const BAD_PLAYER_INPUT: &str = "Expected number of players";
pub const BAD_WINNER_INPUT: &str = "Expected '<name> wins'";
pub const WIN_NOT_SAVED: &str = "Could not record the win";
pub const RETRY_PROMPT: &str = "Press enter to try again";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The winner was declared and the win stored.
    Recorded(HandResult),
    /// The player count could not be parsed; no hand was started.
    InvalidPlayers,
    /// Input ended before a winner was declared.
    Abandoned,
    /// The winner was declared but input ended before the win could be stored.
    Unsaved { winner: String },
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Game(#[from] GameError),
}

pub struct PokerPrompt<R, W> {
    game: Arc<dyn Game>,
    lines: Lines<BufReader<R>>,
    out: TextSink<W>,
}

impl<R, W> PokerPrompt<R, W>
where
    R: AsyncRead + Unpin,
    W: Write + Send + 'static,
{
    pub fn new(game: Arc<dyn Game>, input: R, out: TextSink<W>) -> Self {
        Self {
            game,
            lines: BufReader::new(input).lines(),
            out,
        }
    }

    /// Play one hand. Blind alerts are written to the same output while the
    /// prompt waits for the winner line.
    pub async fn play(&mut self) -> Result<PromptOutcome, PromptError> {
        self.out.write_text(PLAYER_PROMPT)?;

        let Some(line) = self.lines.next_line().await? else {
            return Ok(PromptOutcome::Abandoned);
        };
        let players = match line.parse::<PlayerCount>() {
            Ok(players) => players,
            Err(err) => {
                debug!(target = LOG_TARGET, error = %err, "rejected player count");
                self.out.write_text(BAD_PLAYER_INPUT)?;
                return Ok(PromptOutcome::InvalidPlayers);
            }
        };

        let sink: SharedSink = Arc::new(self.out.clone());
        self.game.start(players, sink)?;

        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.game.abandon();
                    return Ok(PromptOutcome::Abandoned);
                }
                Err(err) => {
                    self.game.abandon();
                    return Err(err.into());
                }
            };

            match WinnerDeclaration::from_line(&line) {
                Ok(winner) => {
                    return match self.game.finish(winner.name()) {
                        Ok(result) => Ok(PromptOutcome::Recorded(result)),
                        Err(err @ GameError::Persistence { .. }) => {
                            self.retry_until_saved(err, winner.into_name()).await
                        }
                        Err(err) => Err(err.into()),
                    };
                }
                Err(err) => {
                    debug!(target = LOG_TARGET, error = %err, "rejected winner line");
                    self.out.write_line(BAD_WINNER_INPUT)?;
                }
            }
        }
    }

    /// Offer to retry a win the store refused, once per input line.
    async fn retry_until_saved(
        &mut self,
        mut failure: GameError,
        winner: String,
    ) -> Result<PromptOutcome, PromptError> {
        loop {
            warn!(target = LOG_TARGET, winner = %winner, error = %failure, "win not recorded");
            self.out.write_line(WIN_NOT_SAVED)?;
            self.out.write_line(RETRY_PROMPT)?;

            if self.lines.next_line().await?.is_none() {
                return Ok(PromptOutcome::Unsaved { winner });
            }
            match self.game.retry_commit() {
                Ok(result) => return Ok(PromptOutcome::Recorded(result)),
                Err(err @ GameError::Persistence { .. }) => failure = err,
                Err(err) => return Err(err.into()),
            }
        }
    }
}
