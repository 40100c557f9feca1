use anyhow::Result;

use crate::commands::Session;

pub fn run(session: &Session) -> Result<()> {
    let config = session.config()?;
    let source = if session.config_path.exists() {
        session.config_path.display().to_string()
    } else {
        "(defaults, no config file)".to_string()
    };
    println!("# {source}");
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}
