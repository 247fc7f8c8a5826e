use std::io::Stdout;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use poker_league::cli::{PokerPrompt, PromptOutcome};
use poker_league::config::LeagueArgs;
use poker_league::game::{Game, GameEngine};
use poker_league::sink::TextSink;

mod common;

const LOG_TARGET: &str = "bin::poker_cli";

#[derive(Debug, Parser)]
#[command(name = "poker_cli")]
#[command(about = "Play one hand of poker at the terminal and record the winner", long_about = None)]
struct Args {
    #[command(flatten)]
    league: LeagueArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    common::load_dotenv();
    let args = Args::parse();
    common::init_tracing(args.league.json, "warn")?;

    let store = args
        .league
        .open_file_store()
        .with_context(|| format!("failed to open league {}", args.league.store.display()))?;
    let blinds = args
        .league
        .blind_structure()
        .context("invalid blind structure")?;
    let game: Arc<dyn Game> = Arc::new(GameEngine::new(Arc::clone(&store), blinds));

    let out: TextSink<Stdout> = TextSink::new(std::io::stdout());
    out.write_line("Let's play poker")?;
    out.write_line("Type {Name} wins to record a win")?;

    let mut prompt = PokerPrompt::new(game, tokio::io::stdin(), out);
    match prompt.play().await? {
        PromptOutcome::Recorded(result) => {
            info!(target = LOG_TARGET, winner = %result.winner, wins = result.wins, "win recorded");
        }
        PromptOutcome::InvalidPlayers | PromptOutcome::Abandoned => {}
        PromptOutcome::Unsaved { winner } => {
            anyhow::bail!("win for {winner} was not recorded");
        }
    }

    Ok(())
}
