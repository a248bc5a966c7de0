use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context;

use crate::{
    command::run::{RunOptions, process_records},
    schema::{BenchEntry, BenchReport},
    util::{Input, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchArg {
    /// Input files, or directories whose `.txt` files are all run
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Directory receiving one `<name>_output.txt` per input file
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,
    /// Also save the measurements as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

pub(crate) fn run(arg: &BenchArg) -> anyhow::Result<()> {
    let BenchArg {
        inputs,
        output_dir,
        report,
    } = arg;

    let input_files = collect_input_files(inputs)?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let start = Instant::now();
    let mut files = vec![];
    for input_path in input_files {
        let entry = bench_file(&input_path, output_dir)?;
        eprintln!("Test: {}", entry.name);
        eprintln!("  Time:    {:.3} seconds", entry.elapsed_secs);
        eprintln!(
            "  Records: {} ({} aborted)",
            entry.records, entry.aborted_records
        );
        eprintln!("  Pieces:  {}", entry.completed_pieces);
        eprintln!("  Output:  {}", entry.output.display());
        files.push(entry);
    }
    let total_elapsed_secs = start.elapsed().as_secs_f64();
    eprintln!();
    eprintln!(
        "Ran {} files in {total_elapsed_secs:.3} seconds",
        files.len()
    );

    if let Some(path) = report {
        let report = BenchReport {
            files,
            total_elapsed_secs,
        };
        Output::save_json(&report, Some(path.clone()))?;
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}

fn bench_file(input_path: &Path, output_dir: &Path) -> anyhow::Result<BenchEntry> {
    let name = input_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("Invalid input file name: {}", input_path.display()))?;
    let output_path = output_dir.join(format!("{name}_output.txt"));

    let input = Input::open(input_path.to_owned())?;
    let mut output = Output::create(output_path.clone())?;

    let start = Instant::now();
    let summary = process_records(input, &mut output, RunOptions::default())
        .with_context(|| format!("Failed to process records from {}", input_path.display()))?;
    output.finish()?;
    let elapsed_secs = start.elapsed().as_secs_f64();

    Ok(BenchEntry {
        name,
        input: input_path.to_owned(),
        output: output_path,
        elapsed_secs,
        records: summary.records,
        aborted_records: summary.aborted_records,
        completed_pieces: summary.completed_pieces,
    })
}

/// Expands directories into their `.txt` files, sorted by name.
fn collect_input_files(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        let entries = fs::read_dir(input)
            .with_context(|| format!("Failed to read directory: {}", input.display()))?;
        let mut dir_files = vec![];
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to read directory: {}", input.display()))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                dir_files.push(path);
            }
        }
        dir_files.sort();
        files.extend(dir_files);
    }
    Ok(files)
}
