//! Command-line entry point.
//!
//! ```text
//! protocolgen protocol.json --output_dir gen [--template_dir templates]
//! ```

use anyhow::Context;
use clap::Parser;
use protocolgen::{GeneratorConfig, run};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Generates protocol dispatcher, frontend and type builder sources.
#[derive(Parser, Debug)]
#[command(name = "protocolgen", version)]
#[command(about = "Generate protocol sources from a JSON schema")]
struct Args {
    /// Protocol schema (JSON with top-level `domains`)
    schema: PathBuf,

    /// Directory receiving the generated files
    #[arg(long = "output_dir")]
    output_dir: PathBuf,

    /// Directory holding `<artifact>_h.template` / `<artifact>_cpp.template`
    #[arg(long = "template_dir")]
    template_dir: Option<PathBuf>,
}

fn generate(args: Args) -> anyhow::Result<()> {
    let mut builder = GeneratorConfig::builder()
        .schema_path(args.schema)
        .output_dir(args.output_dir);
    if let Some(dir) = args.template_dir {
        builder = builder.template_dir(dir);
    }
    let config = builder.build()?;

    let written = run(&config).with_context(|| {
        format!("failed to generate from {}", config.schema_path().display())
    })?;
    tracing::info!("Generated {} files", written.len());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "protocolgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match generate(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
