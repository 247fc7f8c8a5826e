//! Outbound notifications and the destinations that accept them.
//!
//! The engine and the blind scheduler only ever see a [`GameSink`]; whether the
//! messages end up on a terminal or a WebSocket is decided by the transport.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameMessage {
    BlindChanged { amount: u64 },
    WinRecorded { name: String, wins: u64 },
}

impl fmt::Display for GameMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMessage::BlindChanged { amount } => write!(f, "Blind is now {amount}"),
            GameMessage::WinRecorded { name, wins } => {
                let noun = if *wins == 1 { "win" } else { "wins" };
                write!(f, "{name} now has {wins} {noun}")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink closed")]
    Closed,
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub trait GameSink: Send + Sync {
    fn deliver(&self, message: GameMessage) -> Result<(), SinkError>;
}

pub type SharedSink = Arc<dyn GameSink>;

/// Forwards messages to a task that owns the real transport (e.g. a socket writer).
impl<T> GameSink for mpsc::UnboundedSender<T>
where
    T: From<GameMessage> + Send,
{
    fn deliver(&self, message: GameMessage) -> Result<(), SinkError> {
        self.send(T::from(message)).map_err(|_| SinkError::Closed)
    }
}

/// Line-per-message text output over any `io::Write`.
///
/// Clones share the same writer, so a prompt and the hand it starts write to one
/// stream without interleaving partial lines.
pub struct TextSink<W> {
    out: Arc<Mutex<W>>,
}

impl<W> Clone for TextSink<W> {
    fn clone(&self) -> Self {
        Self {
            out: Arc::clone(&self.out),
        }
    }
}

impl<W: Write + Send> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    /// Write `text` verbatim and flush.
    pub fn write_text(&self, text: &str) -> std::io::Result<()> {
        let mut out = self.out.lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    pub fn write_line(&self, text: &str) -> std::io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{text}")?;
        out.flush()
    }
}

impl<W: AsRef<[u8]>> TextSink<W> {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(self.out.lock().as_ref()).into_owned()
    }
}

impl<W: Write + Send> GameSink for TextSink<W> {
    fn deliver(&self, message: GameMessage) -> Result<(), SinkError> {
        self.write_line(&message.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_sink_writes_one_line_per_message() {
        let sink = TextSink::new(Vec::new());
        sink.deliver(GameMessage::BlindChanged { amount: 100 }).unwrap();
        sink.deliver(GameMessage::WinRecorded {
            name: "Pepper".into(),
            wins: 3,
        })
        .unwrap();
        assert_eq!(sink.contents(), "Blind is now 100\nPepper now has 3 wins\n");
    }

    #[test]
    fn win_confirmation_uses_singular_for_one_win() {
        let first = GameMessage::WinRecorded {
            name: "Ruth".into(),
            wins: 1,
        };
        assert_eq!(first.to_string(), "Ruth now has 1 win");
    }

    #[test]
    fn channel_sink_reports_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel::<GameMessage>();
        drop(rx);
        let err = tx
            .deliver(GameMessage::BlindChanged { amount: 200 })
            .unwrap_err();
        assert!(matches!(err, SinkError::Closed));
    }

    #[test]
    fn messages_serialize_with_type_tag() {
        let json = serde_json::to_string(&GameMessage::BlindChanged { amount: 300 }).unwrap();
        assert_eq!(json, r#"{"type":"blind_changed","amount":300}"#);
    }
}
