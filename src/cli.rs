use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{CompletionsCommand, ConfigureCommand, IssueCommand, ServeCommand};
use crate::config::ConfigSource;

#[derive(Debug, Clone, Parser)]
#[command(name = "stsgate", version, about = "Exchange static AWS keys for STS session credentials", long_about = None)]
pub struct Cli {
    #[arg(
        short = 'c',
        long,
        global = true,
        value_name = "PATH",
        help = "Properties file with app.environment.accessKeyId / secretAccessKey"
    )]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v debug, -vv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Serve session tokens over HTTP")]
    Serve(ServeCommand),
    #[command(about = "Issue one session token and print it")]
    Issue(IssueCommand),
    #[command(about = "Store the static AWS keys in the properties file")]
    Configure(ConfigureCommand),
    #[command(about = "Generate shell completion scripts for stsgate")]
    Completions(CompletionsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let source = ConfigSource::new(self.config);
        let command = self
            .command
            .unwrap_or_else(|| Commands::Serve(ServeCommand::default()));

        match command {
            Commands::Serve(cmd) => cmd.execute(source).await,
            Commands::Issue(cmd) => cmd.execute(source).await,
            Commands::Configure(cmd) => cmd.execute(&source).await,
            Commands::Completions(cmd) => cmd.execute(),
        }
    }
}
