use clap::{Parser, Subcommand};

use self::{bench::BenchArg, generate::GenerateArg, run::RunArg};

mod bench;
mod generate;
mod print_shapes;
mod run;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in (defaults to `run`, reading stdin)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Simulate every input record and print one height per line
    Run(#[clap(flatten)] RunArg),
    /// Print the block layout of every shape
    PrintShapes,
    /// Generate input records
    Generate(#[clap(flatten)] GenerateArg),
    /// Time the simulation over input files
    Bench(#[clap(flatten)] BenchArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Run(RunArg::default())) {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::PrintShapes => print_shapes::run()?,
        Mode::Generate(arg) => generate::run(&arg)?,
        Mode::Bench(arg) => bench::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_args() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_default_mode_is_none() {
        let args = CommandArgs::try_parse_from(["stackfall"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_parse_modes() {
        let args =
            CommandArgs::try_parse_from(["stackfall", "run", "input.txt", "--format", "json"])
                .unwrap();
        assert!(matches!(args.mode, Some(Mode::Run(_))));

        let args = CommandArgs::try_parse_from([
            "stackfall",
            "generate",
            "--kind",
            "alternating-clear",
            "--seed",
            "0123456789abcdef0123456789abcdef",
        ])
        .unwrap();
        assert!(matches!(args.mode, Some(Mode::Generate(_))));

        assert!(CommandArgs::try_parse_from(["stackfall", "generate", "--kind", "nope"]).is_err());
        assert!(CommandArgs::try_parse_from(["stackfall", "generate", "--seed", "xyz"]).is_err());
    }
}
