//! HTTP and WebSocket front end for the league and the game engine.

use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::game::Game;
use crate::store::SharedPlayerStore;

pub mod bootstrap;
pub mod error;
pub mod logging;
pub mod routes;
pub mod ws;

pub use bootstrap::{run_server, ServerConfig};
pub use routes::ServerContext;

/// Axum facade: `/league`, `/players/:name` and the `/ws` game socket.
pub struct PokerServer {
    router: Router,
}

impl PokerServer {
    pub fn new(store: SharedPlayerStore, game: Arc<dyn Game>) -> Self {
        let context = Arc::new(ServerContext { store, game });

        let router = Router::new()
            .route("/league", get(routes::get_league))
            .route(
                "/players/:name",
                get(routes::get_score).post(routes::post_win),
            )
            .route("/ws", get(ws::play_over_socket))
            .layer(middleware::from_fn(logging::log_requests))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(context);

        Self { router }
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}
