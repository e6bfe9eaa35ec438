use std::time::Duration;

use crate::constants::DEFAULT_TIMEOUT;

pub mod completions;
pub mod configure;
pub mod issue;
pub mod serve;

pub use completions::CompletionsCommand;
pub use configure::ConfigureCommand;
pub use issue::IssueCommand;
pub use serve::ServeCommand;

fn exchange_timeout(timeout_secs: Option<u64>) -> Duration {
    timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs)
}
