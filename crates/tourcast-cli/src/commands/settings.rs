//! Engine configuration command

use anyhow::{Context, Result};
use tourcast_core::config::default_config_path;
use tourcast_core::EngineConfig;

pub fn cmd_config(config: &EngineConfig) -> Result<()> {
    if let Some(path) = default_config_path() {
        let state = if path.exists() { "active" } else { "not present" };
        println!("# Override file: {} ({})", path.display(), state);
    }
    let rendered = config.to_toml().context("Failed to render engine config")?;
    print!("{}", rendered);
    Ok(())
}
