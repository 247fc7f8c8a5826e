//! Startup helpers shared by the poker binaries.

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Load `.env` from the crate directory first, then from the working directory.
pub fn load_dotenv() {
    let manifest_env = env!("CARGO_MANIFEST_DIR");
    let manifest_env_path = PathBuf::from(manifest_env).join(".env");
    dotenv::from_filename(manifest_env_path).ok();
    dotenv::dotenv().ok();
}

/// Logs go to stderr so they never mix with the game's own output on stdout.
pub fn init_tracing(json: bool, default_directive: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = fmt::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }

    Ok(())
}
