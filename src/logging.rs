use anyhow::Result;
use tracing::{Level, subscriber};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Directive used when `RUST_LOG` is unset.
///
/// `-v` raises only this crate's level; the AWS SDK and HTTP stack stay at
/// `warn` until `-vv`, where everything goes to `trace`.
pub fn default_directive(verbose: u8) -> String {
    match verbose {
        0 => format!("warn,stsgate={}", Level::INFO),
        1 => format!("warn,stsgate={}", Level::DEBUG),
        _ => Level::TRACE.to_string(),
    }
}

/// Install the global subscriber. Output goes to stderr so `issue` keeps
/// stdout for the credential JSON.
pub fn init(verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose >= 1)
        .with_file(verbose >= 2)
        .with_line_number(verbose >= 2)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    subscriber::set_global_default(subscriber)?;
    Ok(())
}
