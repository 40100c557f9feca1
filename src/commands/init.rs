use anyhow::Result;
use dialoguer::Input;

use crate::commands::Session;
use crate::config::{save_config, FlameConfig};

pub async fn run(session: &Session) -> Result<()> {
    let path = &session.config_path;
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    let address = match &session.address {
        Some(address) => address.clone(),
        None => Input::new()
            .with_prompt("Registry address")
            .default(FlameConfig::default().with_overrides(None).address)
            .interact_text()?,
    };

    let cfg = FlameConfig {
        address,
        ..Default::default()
    };
    cfg.validate()?;
    save_config(&cfg, path)?;
    println!("Created {}", path.display());
    Ok(())
}
