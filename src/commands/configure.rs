use anyhow::Result;
use clap::Args;

use crate::config::{self, ConfigSource};

#[derive(Debug, Clone, Args)]
pub struct ConfigureCommand {}

impl ConfigureCommand {
    pub async fn execute(self, source: &ConfigSource) -> Result<()> {
        config::configure_interactive(source).await
    }
}
