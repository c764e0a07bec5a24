//! Fetches the most recent block from the first responsive Ethereum JSON-RPC endpoint
//! and renders a short human-readable report.

pub mod block;
pub mod config;
pub mod error;
pub mod prober;
pub mod rpc;

use std::io::Write;

use crate::block::format_block_report;
use crate::config::Config;
use crate::error::ApplicationResult;
use crate::prober::EndpointProber;

/// Probe the configured endpoints, then print the report for the first block returned.
/// On any error nothing past the progress lines has been written.
pub async fn run<W: Write>(config: &Config, out: &mut W) -> ApplicationResult<()> {
    writeln!(out, "Fetching latest Ethereum block...")?;
    let prober = EndpointProber::new(config)?;
    let result = prober.fetch_latest_block(out).await?;
    let report = format_block_report(&result)?;
    write!(out, "{report}")?;
    out.flush()?;
    Ok(())
}
