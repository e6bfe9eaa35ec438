use anyhow::{Context, Result};
use clap::{Args, CommandFactory};
use clap_complete::Shell;
use std::io::{self, Write};

use crate::cli::Cli;

#[derive(Debug, Clone, Args)]
pub struct CompletionsCommand {
    #[arg(value_enum, help = "Target shell for completion script")]
    pub shell: Shell,
}

impl CompletionsCommand {
    pub fn execute(self) -> Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_to(&mut stdout)?;
        stdout.flush().context("Failed to write completion script")
    }

    /// Render the completion script for the `stsgate` binary into `out`
    pub fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        let mut script = Vec::new();
        clap_complete::generate(self.shell, &mut cmd, bin_name, &mut script);
        out.write_all(&script)
            .with_context(|| format!("Failed to write {} completion script", self.shell))
    }
}
