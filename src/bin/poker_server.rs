use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use poker_league::config::LeagueArgs;
use poker_league::server::{run_server, ServerConfig};

mod common;

const DEFAULT_BIND: &str = "127.0.0.1:5000";

#[derive(Debug, Parser)]
#[command(name = "poker_server")]
#[command(about = "Serve the league table and the WebSocket game", long_about = None)]
struct Args {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "POKER_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Keep the league in memory instead of the store file
    #[arg(long, env = "POKER_IN_MEMORY", default_value_t = false)]
    in_memory: bool,

    #[command(flatten)]
    league: LeagueArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    common::load_dotenv();
    let args = Args::parse();
    common::init_tracing(args.league.json, "info")?;
    let config = build_config(&args)?;
    run_server(config).await
}

fn build_config(args: &Args) -> Result<ServerConfig> {
    let store = args
        .league
        .open_store(args.in_memory)
        .with_context(|| format!("failed to open league {}", args.league.store.display()))?;
    let blinds = args
        .league
        .blind_structure()
        .context("invalid blind structure")?;

    Ok(ServerConfig {
        bind: args.bind,
        store,
        blinds,
    })
}
