use std::io;

use anyhow::{Context, Result};
use env_logger::Env;

use phrase_batch::pipeline::{print_phrases, PrintConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = PrintConfig::default();

    print_phrases(&config, io::stdout().lock())
        .with_context(|| format!("Unable to print phrases from {}", config.input.display()))?;

    Ok(())
}
