use anyhow::{Context, Result};
use env_logger::Env;

use phrase_batch::pipeline::{convert_phrases, ConvertConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ConvertConfig::default();

    convert_phrases(&config).with_context(|| {
        format!(
            "Unable to convert {} to {}",
            config.input.display(),
            config.output.display()
        )
    })?;

    println!("変換完了");

    Ok(())
}
