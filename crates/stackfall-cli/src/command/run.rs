use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use stackfall_engine::{RecordReport, SimulationEvent, run_record, run_record_observed};

use crate::{
    schema::RecordResult,
    util::{Input, Output},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum OutputFormat {
    /// One height per line
    #[default]
    Text,
    /// One JSON object per line with failure details and statistics
    Json,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Input file with one record per line (stdin if omitted)
    input: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "text")]
    format: OutputFormat,
    /// Draw the grid to stderr after every drop and every line clear
    #[arg(long)]
    visualize: bool,
    /// Report the reason of every aborted record to stderr
    #[arg(long)]
    verbose: bool,
}

#[derive(Default, Debug, Clone, Copy)]
pub(crate) struct RunOptions {
    pub format: OutputFormat,
    pub visualize: bool,
    pub verbose: bool,
}

/// Totals over all records of one input.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub records: usize,
    pub aborted_records: usize,
    pub completed_pieces: usize,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        input,
        output,
        format,
        visualize,
        verbose,
    } = arg;
    let input = Input::for_path(input.clone())?;
    let input_path = input.display_path();
    let mut output = Output::for_path(output.clone())?;
    let options = RunOptions {
        format: *format,
        visualize: *visualize,
        verbose: *verbose,
    };

    let summary = process_records(input, &mut output, options)
        .with_context(|| format!("Failed to process records from {input_path}"))?;
    output.finish()?;

    if *verbose {
        eprintln!(
            "Processed {} records ({} aborted, {} pieces placed)",
            summary.records, summary.aborted_records, summary.completed_pieces
        );
    }
    Ok(())
}

/// Simulates every line of `input` and writes one result per line to `output`.
///
/// Each record runs on its own grid; an aborted record does not affect the ones after it.
pub(crate) fn process_records<R, W>(
    input: R,
    output: &mut W,
    options: RunOptions,
) -> anyhow::Result<RunSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = RunSummary::default();
    for (index, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read record #{index}"))?;
        let report = if options.visualize {
            run_record_observed(&line, |command_index, event| {
                visualize_event(index, command_index, event);
            })
        } else {
            run_record(&line)
        };

        summary.records += 1;
        summary.completed_pieces += report.stats().completed_pieces();
        if let Some(error) = report.error() {
            summary.aborted_records += 1;
            if options.verbose {
                eprintln!("Record #{index} aborted: {error} ({})", error.kind());
            }
        }

        write_report(output, index, &report, options.format)
            .with_context(|| format!("Failed to write result of record #{index}"))?;
    }
    Ok(summary)
}

fn write_report<W>(
    output: &mut W,
    index: usize,
    report: &RecordReport,
    format: OutputFormat,
) -> anyhow::Result<()>
where
    W: Write,
{
    match format {
        OutputFormat::Text => writeln!(output, "{}", report.output())?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *output, &RecordResult::new(index, report))?;
            writeln!(output)?;
        }
    }
    Ok(())
}

fn visualize_event(record_index: usize, command_index: usize, event: SimulationEvent<'_>) {
    match event {
        SimulationEvent::Dropped {
            command,
            placement,
            grid,
        } => {
            eprintln!(
                "Record #{record_index}, command #{command_index}: {command} lands on row {}",
                placement.landing_row()
            );
            eprint!("{grid}");
        }
        SimulationEvent::Cleared { rows, grid } => {
            eprintln!("Cleared rows {rows:?}");
            eprint!("{grid}");
        }
    }
}
