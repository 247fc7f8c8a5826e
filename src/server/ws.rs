use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cli::{BAD_PLAYER_INPUT, WIN_NOT_SAVED};
use crate::game::{Game, GameError, PlayerCount, WinnerDeclaration};
use crate::sink::{GameMessage, SharedSink};
use crate::tokio_tools::spawn_named_task;

use super::routes::SharedContext;

const LOG_TARGET: &str = "server::ws";

/// Frames queued for the socket writer.
#[derive(Debug)]
enum Outbound {
    Game(GameMessage),
    Notice(String),
    Close,
}

impl From<GameMessage> for Outbound {
    fn from(message: GameMessage) -> Self {
        Outbound::Game(message)
    }
}

pub(super) async fn play_over_socket(
    State(ctx): State<SharedContext>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_hand(ctx, socket))
}

/// One hand per connection: the first text frame is the player count, the next
/// one names the winner. Blind alerts are pushed while waiting for the winner.
async fn run_hand(ctx: SharedContext, socket: WebSocket) {
    let connection = Uuid::new_v4();
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Outbound>();
    let writer = spawn_named_task(format!("ws-writer-{connection}"), write_frames(sender, rx));

    info!(target = LOG_TARGET, %connection, "websocket connected");
    play(&ctx, connection, &tx, &mut receiver).await;

    let _ = tx.send(Outbound::Close);
    let _ = writer.await;
    info!(target = LOG_TARGET, %connection, "websocket closed");
}

async fn play(
    ctx: &SharedContext,
    connection: Uuid,
    tx: &mpsc::UnboundedSender<Outbound>,
    receiver: &mut SplitStream<WebSocket>,
) {
    let notice = |text: String| {
        let _ = tx.send(Outbound::Notice(text));
    };

    let Some(raw_count) = next_text(receiver).await else {
        return;
    };
    let players = match raw_count.parse::<PlayerCount>() {
        Ok(players) => players,
        Err(err) => {
            debug!(target = LOG_TARGET, %connection, error = %err, "rejected player count");
            notice(BAD_PLAYER_INPUT.to_string());
            return;
        }
    };

    let sink: SharedSink = Arc::new(tx.clone());
    match on_game(ctx, move |game| game.start(players, sink)).await {
        Some(Ok(_)) => {}
        Some(Err(err)) => {
            warn!(target = LOG_TARGET, %connection, error = %err, "could not start hand");
            notice(client_message(&err));
            return;
        }
        None => return,
    }

    loop {
        let Some(line) = next_text(receiver).await else {
            ctx.game.abandon();
            return;
        };
        match WinnerDeclaration::from_line(&line) {
            Ok(winner) => {
                let finished = on_game(ctx, move |game| game.finish(winner.name())).await;
                if let Some(Err(err)) = finished {
                    warn!(target = LOG_TARGET, %connection, error = %err, "could not finish hand");
                    notice(client_message(&err));
                }
                return;
            }
            Err(err) => notice(err.to_string()),
        }
    }
}

/// Run an engine call on the blocking pool; a commit writes the store file.
async fn on_game<T, F>(ctx: &SharedContext, call: F) -> Option<Result<T, GameError>>
where
    F: FnOnce(&dyn Game) -> Result<T, GameError> + Send + 'static,
    T: Send + 'static,
{
    let game = Arc::clone(&ctx.game);
    match tokio::task::spawn_blocking(move || call(game.as_ref())).await {
        Ok(result) => Some(result),
        Err(err) => {
            warn!(target = LOG_TARGET, error = %err, "game call did not complete");
            None
        }
    }
}

/// Store details stay in the server log.
fn client_message(err: &GameError) -> String {
    match err {
        GameError::Persistence { .. } => {
            format!("{WIN_NOT_SAVED}; it will be saved before the next hand")
        }
        GameError::Protocol(err) => err.to_string(),
    }
}

async fn write_frames(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
) {
    while let Some(outbound) = rx.recv().await {
        let text = match outbound {
            Outbound::Game(message) => message.to_string(),
            Outbound::Notice(text) => text,
            Outbound::Close => break,
        };
        if let Err(err) = sender.send(Message::Text(text)).await {
            debug!(target = LOG_TARGET, error = %err, "socket write failed");
            break;
        }
    }
    let _ = sender.close().await;
}

async fn next_text(receiver: &mut SplitStream<WebSocket>) -> Option<String> {
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => return Some(text),
            Ok(Message::Close(_)) => return None,
            Ok(_) => continue,
            Err(err) => {
                debug!(target = LOG_TARGET, error = %err, "socket read failed");
                return None;
            }
        }
    }
    None
}
