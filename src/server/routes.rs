use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::game::Game;
use crate::league::League;
use crate::store::SharedPlayerStore;

use super::error::ApiError;

#[derive(Clone)]
pub struct ServerContext {
    pub store: SharedPlayerStore,
    pub game: Arc<dyn Game>,
}

pub type SharedContext = Arc<ServerContext>;

pub(super) async fn get_league(State(ctx): State<SharedContext>) -> Json<League> {
    Json(ctx.store.league())
}

/// Score as plain text; a player without wins is reported as 404 with body `0`.
pub(super) async fn get_score(
    State(ctx): State<SharedContext>,
    Path(name): Path<String>,
) -> Response {
    let score = ctx.store.score(&name);
    let status = if score == 0 {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, score.to_string()).into_response()
}

pub(super) async fn post_win(
    State(ctx): State<SharedContext>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("player name must not be blank"));
    }
    let store = Arc::clone(&ctx.store);
    let name = name.to_string();
    tokio::task::spawn_blocking(move || store.record_win(&name))
        .await
        .map_err(|err| ApiError::internal(format!("win recording did not complete: {err}")))??;
    Ok(StatusCode::ACCEPTED)
}
