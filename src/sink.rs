//! Render registry records to an output stream.

use crate::config::GetErrorMode;
use crate::error::{Error, Result};
use crate::registry::{Pager, Resource};
use std::io::Write;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// The resource name only
    Name,
    /// One JSON object per line
    Json,
    /// YAML documents separated by `---`
    Yaml,
}

pub fn render<W: Write>(out: &mut W, record: &Resource, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Name => writeln!(out, "{}", record.name)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(record)?)?,
        OutputFormat::Yaml => {
            let doc = serde_yaml::to_string(record)
                .map_err(|e| Error::Io(std::io::Error::other(e)))?;
            write!(out, "---\n{doc}")?;
        }
    }
    Ok(())
}

/// Pull every record from `pager` and render it as it arrives.
///
/// Returns the number of records rendered. A pull error stops the loop
/// immediately; records rendered before it stay rendered.
pub async fn drain<W: Write>(
    pager: &mut Pager,
    out: &mut W,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<usize> {
    let mut count = 0;
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            next = pager.next() => next?,
        };
        let Some(record) = next else {
            break;
        };
        render(out, &record, format)?;
        count += 1;
    }
    out.flush()?;
    tracing::debug!(count, kind = %pager.kind(), "listing complete");
    Ok(count)
}

/// Render the outcome of a get.
///
/// With [`GetErrorMode::Render`] a failed get renders an empty record and the
/// error is only logged.
pub fn render_get<W: Write>(
    out: &mut W,
    result: Result<Resource>,
    format: OutputFormat,
    mode: GetErrorMode,
) -> Result<()> {
    let record = match (result, mode) {
        (Ok(record), _) => record,
        (Err(e), GetErrorMode::Fail) => return Err(e),
        (Err(e), GetErrorMode::Render) => {
            tracing::warn!(error = %e, "get failed, rendering empty record");
            Resource::default()
        }
    };
    render(out, &record, format)?;
    out.flush()?;
    Ok(())
}
