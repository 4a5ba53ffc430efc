//! Armature - deployment template generator

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use armature::pipeline;

/// Armature - turn a cluster definition into a cloud deployment template
#[derive(Parser, Debug)]
#[command(name = "armature", version, about, long_about = None)]
struct Cli {
    /// Path to the JSON cluster definition file
    definition: PathBuf,

    /// Directory holding the template parts
    #[arg(long, env = "ARMATURE_PARTS_DIR", default_value = "./parts")]
    parts_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays the rendered document
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let definition = std::fs::read(&cli.definition).map_err(|e| {
        anyhow::anyhow!("failed to read definition file {:?}: {}", cli.definition, e)
    })?;

    let rendered = pipeline::generate_template(&definition, &cli.parts_dir)?;
    println!("{rendered}");
    Ok(())
}
