//! butterfly-gen
//!
//! Compute the wiring and layout of a butterfly network and export them as
//! JSON for a renderer or a connection-script emitter.
//!
//! Usage:
//!   butterfly-gen -s 3 -p 32 -r 4 2 4 -d 1920 1080
//!   butterfly-gen --config network.json --view netlist -o netlist.json

mod args;
mod export;

use anyhow::Context;
use butterfly_topology::TopologyModel;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::Cli;
use crate::export::Document;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "butterfly_gen=info,butterfly_topology=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let request = cli.request().context("invalid network configuration")?;

    let model = TopologyModel::build(request.config).context("building network")?;
    let document = Document::assemble(&model, cli.view, request.prefixes.as_deref())?;

    let path = export::destination(
        cli.output.as_deref(),
        cli.output_dir.as_deref(),
        model.config(),
    );
    export::write(&document, path.as_deref(), cli.compact)?;

    tracing::info!(
        stages = model.n_stage(),
        ports = model.n_port(),
        "done"
    );
    Ok(())
}
