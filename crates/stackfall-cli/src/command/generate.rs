use std::{fs, path::PathBuf};

use anyhow::Context;
use rand::Rng as _;
use stackfall_engine::{CaseGenerator, CaseKind, CaseSeed};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
#[command(group = clap::ArgGroup::new("target").required(true).args(["kind", "suite"]))]
pub(crate) struct GenerateArg {
    /// Kind of record to generate
    #[arg(long)]
    kind: Option<CaseKind>,
    /// Write one file per kind into this directory
    #[arg(long)]
    suite: Option<PathBuf>,
    /// Number of pieces, for the kinds that take one
    #[arg(long)]
    num_pieces: Option<usize>,
    /// Seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<CaseSeed>,
    /// Output file path
    #[arg(long, conflicts_with = "suite")]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let GenerateArg {
        kind,
        suite,
        num_pieces,
        seed,
        output,
    } = arg;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Seed: {seed}");
    let mut generator = CaseGenerator::with_seed(seed);

    if let Some(dir) = suite {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        for kind in CaseKind::ALL {
            let mut output = Output::create(dir.join(kind.file_name()))?;
            output.write_line(&generator.generate(kind, *num_pieces))?;
            output.finish()?;
            eprintln!("Generated {kind} case: {}", output.display_path());
        }
        return Ok(());
    }

    let kind = kind.context("Either --kind or --suite is required")?;
    let mut output = Output::for_path(output.clone())?;
    output.write_line(&generator.generate(kind, *num_pieces))?;
    output.finish()?;
    Ok(())
}
