use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::{exit_on_diagnostic, load_config};
use crate::{
    ops::{self, GenerateOptions},
    project::Project,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to the reference engine's querier.go
    pub querier: PathBuf,

    /// Path to multidb.toml (defaults to the one beside the engine packages)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Treat engines missing a method as an error
    #[arg(long)]
    pub strict: bool,

    /// Write per-phase pipeline snapshots to .multidb/debug
    #[arg(long)]
    pub visualize: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let project = Project::discover(&self.querier)?;
        let mut config = load_config(self.config.as_deref(), &project.target_dir).into_config();
        if self.strict {
            config.output.strict = true;
        }

        let report = exit_on_diagnostic(ops::generate(
            &project,
            config,
            GenerateOptions {
                dry_run: self.dry_run,
                visualize: self.visualize,
            },
        ))?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
