//! Offline yarn estimate, same computation as `/calculate/yarn`

use anyhow::{Context, Result};
use clap::Parser;
use smartra_core::estimate::{estimate, EstimateRequest, DEFAULT_GAUGE};

/// Arguments for the estimate command
#[derive(Parser, Debug)]
pub struct EstimateArgs {
    /// Project type (hat, scarf, sweater, blanket)
    pub pattern_type: String,

    /// Size label (hat/sweater: baby, child, adult; scarf: short, medium, long; blanket: baby, throw, full)
    pub size: String,

    /// Yarn weight (lace, fingering, dk, worsted, chunky)
    pub yarn_weight: String,

    /// Stitches per inch (accepted, not used by the estimate)
    #[arg(long, default_value_t = DEFAULT_GAUGE)]
    pub gauge: u32,

    /// Print compact single-line JSON
    #[arg(long)]
    pub compact: bool,
}

pub fn run_estimate(args: EstimateArgs) -> Result<()> {
    let req = EstimateRequest::new(args.pattern_type, args.size, args.yarn_weight)
        .with_gauge(args.gauge);
    let result = estimate(&req);

    let rendered = if args.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    }
    .context("Failed to render estimate")?;

    println!("{}", rendered);
    Ok(())
}
