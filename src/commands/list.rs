use crate::{
    commands::Session,
    config::{GetErrorMode, UnmatchedMode},
    dispatch::{dispatch, Request, Response},
    error::{Error, Result},
    registry::{HttpRegistryClient, RegistryApi},
    resolver::{resolve, Resolution},
    sink::{drain, render_get, OutputFormat},
};
use anyhow::Context;
use clap::Args;
use std::io::{self, Write};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Resource or collection name, e.g. projects/p/products/q/versions
    pub name: String,

    /// Output format [default: name for collections, json for single resources]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Page size requested from the registry
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Override how a failed get is handled
    #[arg(long, value_enum)]
    pub get_errors: Option<GetErrorMode>,

    /// Override how a name that matches no pattern is handled
    #[arg(long, value_enum)]
    pub unmatched: Option<UnmatchedMode>,
}

#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub output: Option<OutputFormat>,
    pub get_errors: GetErrorMode,
    pub unmatched: UnmatchedMode,
    /// Reject collection names (the `get` command).
    pub singular_only: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            output: None,
            get_errors: GetErrorMode::Fail,
            unmatched: UnmatchedMode::Ignore,
            singular_only: false,
        }
    }
}

/// How a single invocation ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A collection was listed; holds the number of records rendered.
    Listed(usize),
    /// A single resource was rendered.
    Rendered,
    /// The input was not a resource name and nothing was done.
    Unrecognized,
}

/// Resolve `input`, issue its request against `api` and render the results.
pub async fn execute<W: Write>(
    api: Arc<dyn RegistryApi>,
    input: &str,
    opts: &ListOptions,
    out: &mut W,
    cancel: &CancellationToken,
) -> Result<Outcome> {
    let name = match resolve(input) {
        Resolution::Matched(name) => name,
        Resolution::NoMatch => {
            return match opts.unmatched {
                UnmatchedMode::Ignore => Ok(Outcome::Unrecognized),
                UnmatchedMode::Fail => Err(Error::Unrecognized(input.to_string())),
            };
        }
    };
    if opts.singular_only && name.pattern().is_collection() {
        return Err(Error::NotSingular(input.to_string()));
    }

    match dispatch(api, Request::for_name(&name)).await {
        Response::List(mut pager) => {
            let format = opts.output.unwrap_or(OutputFormat::Name);
            let count = drain(&mut pager, out, format, cancel).await?;
            Ok(Outcome::Listed(count))
        }
        Response::Get(result) => {
            let format = opts.output.unwrap_or(OutputFormat::Json);
            render_get(out, result, format, opts.get_errors)?;
            Ok(Outcome::Rendered)
        }
    }
}

pub async fn run(args: ListArgs, session: &Session, singular_only: bool) -> anyhow::Result<()> {
    tracing::debug!(name = %args.name, "list called");
    let mut cfg = session.config()?;
    if args.page_size.is_some() {
        cfg.page_size = args.page_size;
    }
    cfg.validate()?;

    let client = HttpRegistryClient::new(&cfg).context("creating registry client")?;
    let opts = ListOptions {
        output: args.output,
        get_errors: args.get_errors.unwrap_or(cfg.get_errors),
        unmatched: args.unmatched.unwrap_or(cfg.unmatched),
        singular_only,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = execute(
        Arc::new(client),
        &args.name,
        &opts,
        &mut out,
        &session.cancel,
    )
    .await
    .with_context(|| format!("{} {}", if singular_only { "get" } else { "list" }, args.name))?;

    if outcome == Outcome::Unrecognized {
        tracing::info!(name = %args.name, "not a resource name, nothing to do");
    }
    Ok(())
}
