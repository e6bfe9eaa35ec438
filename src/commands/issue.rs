use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::exchange_timeout;
use crate::{
    aws::{
        self,
        sts::{AwsStsConnector, TokenExchange},
    },
    config::ConfigSource,
};

#[derive(Debug, Clone, Args)]
pub struct IssueCommand {
    #[arg(short = 't', long, value_name = "SECONDS", help = "Timeout for the STS exchange [default: 30]")]
    pub timeout_secs: Option<u64>,

    #[arg(
        short = 's',
        long,
        value_name = "PROFILE",
        help = "Write the session credentials to this AWS profile instead of stdout"
    )]
    pub save: Option<String>,
}

impl IssueCommand {
    pub async fn execute(self, source: ConfigSource) -> Result<()> {
        info!("Issuing a single STS session token");

        let exchange = TokenExchange::new(AwsStsConnector::default(), source)
            .with_timeout(exchange_timeout(self.timeout_secs));

        let credentials = exchange
            .issue_session_token()
            .await
            .context("Failed to issue STS session token")?;

        match self.save {
            Some(profile) => {
                aws::credentials::save_credentials(&profile, &credentials)
                    .await
                    .context("Failed to save AWS credentials")?;
                println!("AWS session credentials saved to {profile} profile.");
            }
            None => println!("{}", serde_json::to_string_pretty(&credentials)?),
        }

        Ok(())
    }
}
