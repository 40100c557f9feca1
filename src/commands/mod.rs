use crate::config::{load_config, FlameConfig};
use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

pub mod completions;
pub mod config;
pub mod init;
pub mod list;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "List a collection (e.g. projects/p/products) or print a single resource"
    )]
    List(list::ListArgs),
    #[command(about = "Print a single resource; collections are rejected")]
    Get(list::ListArgs),
    #[command(about = "Scaffold a config file with the registry address")]
    Init,
    #[command(about = "Print the effective configuration (no network)")]
    Config,
    #[command(about = "Emit shell completion scripts (bash/zsh/fish)")]
    Completions { shell: String },
}

/// State shared by every command of one invocation.
///
/// The config file is only read by the commands that need it, so a broken file
/// does not stop `init` or `completions`.
pub struct Session {
    pub config_path: PathBuf,
    /// The `--address` flag, if given.
    pub address: Option<String>,
    pub cancel: CancellationToken,
}

impl Session {
    pub fn new(
        config_path: Option<PathBuf>,
        address: Option<String>,
        cancel: CancellationToken,
    ) -> Self {
        Session {
            config_path: config_path.unwrap_or_else(crate::config::default_config_path),
            address,
            cancel,
        }
    }

    /// Load the config file and apply the address overrides.
    pub fn config(&self) -> Result<FlameConfig> {
        Ok(load_config(Some(&self.config_path))?.with_overrides(self.address.clone()))
    }
}

pub async fn run(cmd: Commands, session: &Session) -> Result<()> {
    match cmd {
        Commands::List(args) => list::run(args, session, false).await,
        Commands::Get(args) => list::run(args, session, true).await,
        Commands::Init => init::run(session).await,
        Commands::Config => config::run(session),
        Commands::Completions { shell } => completions::run(shell),
    }
}
