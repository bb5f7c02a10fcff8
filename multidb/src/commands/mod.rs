mod check;
mod completions;
mod generate;

use std::path::Path;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use multidb_codegen::CodegenError;
use multidb_config::ConfigFile;
use multidb_model::ExtractError;

/// Extension trait for exiting on config errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for multidb_config::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with(miette::Report::new(*e)),
        }
    }
}

/// Parse and modeling failures carry source spans and help text, so they
/// are printed as miette reports. Anything else is handed back to eyre.
pub(crate) fn exit_on_diagnostic<T>(result: Result<T>) -> Result<T> {
    result.map_err(|report| {
        let report = match report.downcast::<Box<ExtractError>>() {
            Ok(e) => exit_with(miette::Report::new(*e)),
            Err(report) => report,
        };
        match report.downcast::<Box<CodegenError>>() {
            Ok(e) => exit_with(miette::Report::new(*e)),
            Err(report) => report,
        }
    })
}

fn exit_with(report: miette::Report) -> ! {
    eprintln!("{:?}", report);
    std::process::exit(1);
}

/// Load the explicit config file, or `multidb.toml` beside the engine
/// packages when none is given.
pub(crate) fn load_config(explicit: Option<&Path>, target_dir: &Path) -> ConfigFile {
    match explicit {
        Some(path) => ConfigFile::open(path),
        None => ConfigFile::discover(target_dir),
    }
    .unwrap_or_exit()
}

#[derive(Parser)]
#[command(name = "multidb")]
#[command(version)]
#[command(about = "Generate multi-engine Go adapters from a sqlc Querier")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate models, interface, errors and one adapter per engine
    Generate(GenerateCommand),

    /// Validate engine coverage without writing any files
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["multidb", "-vv", "check", "db/postgresdb/querier.go"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::parse_from([
            "multidb",
            "generate",
            "db/postgresdb/querier.go",
            "--dry-run",
            "--strict",
        ]);
        let Commands::Generate(cmd) = cli.command else {
            panic!("expected generate");
        };
        assert!(cmd.dry_run);
        assert!(cmd.strict);
        assert!(!cmd.visualize);
        assert!(cmd.config.is_none());
    }
}
