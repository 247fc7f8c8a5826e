pub mod blinds;
pub mod cli;
pub mod config;
pub mod game;
pub mod league;
pub mod server;
pub mod sink;
pub mod store;
pub mod tokio_tools;

pub use blinds::{BlindStructure, ScheduledAlert};
pub use game::{Game, GameEngine, GameError, HandStatus, PlayerCount, ProtocolError};
pub use league::{League, Player};
pub use sink::{GameMessage, GameSink, SharedSink};
pub use store::{FileSystemPlayerStore, InMemoryPlayerStore, PlayerStore, StoreError};
