//! # flame
//!
//! Core library for the `flame` command-line client of the API Registry.
//!
//! A resource name typed by the user is resolved against the registry's name
//! grammar ([`names`], [`resolver`]), turned into one list or get request
//! ([`dispatch`]) and the results are streamed to stdout ([`sink`]).

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod names;
pub mod registry;
pub mod resolver;
pub mod sink;
pub mod store;

pub use error::{Error, Result};

/// Browse products, versions, specs and files in an API Registry
#[derive(Parser, Debug)]
#[command(
    name = "flame",
    version,
    about = "Browse products, versions, specs and files in an API Registry",
    long_about = "Browse products, versions, specs and files in an API Registry.\n\nResources are addressed by name, for example:\n  projects/my-project/products\n  projects/my-project/products/petstore/versions/1.0.0/specs/openapi.yaml"
)]
pub struct Cli {
    /// Registry address (overrides the config file and FLAME_ADDRESS)
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics written to stderr (RUST_LOG takes precedence)
    #[arg(long, value_enum, global = true, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
