use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::{exit_on_diagnostic, load_config};
use crate::{
    ops,
    project::Project,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the reference engine's querier.go
    pub querier: PathBuf,

    /// Path to multidb.toml (defaults to the one beside the engine packages)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Treat engines missing a method as an error
    #[arg(long)]
    pub strict: bool,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let project = Project::discover(&self.querier)?;
        let config_file = load_config(self.config.as_deref(), &project.target_dir);
        let config_path = config_file.path().map(|p| p.to_path_buf());
        let mut config = config_file.into_config();
        if self.strict {
            config.output.strict = true;
        }

        let report = exit_on_diagnostic(ops::check(&project, config, config_path))?;
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }

        Ok(())
    }
}
