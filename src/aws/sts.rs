use std::{ops::Deref, time::Duration};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sts::{
    Client as StsClient,
    config::{
        Config as StsConfig, Credentials as StaticCredentials, HttpClient, IntoShared,
        SharedHttpClient,
    },
};
use aws_smithy_types::{DateTime, date_time::Format, timeout::TimeoutConfig};
use thiserror::Error;
use tracing::{debug, info};

use super::{REDACTED, SessionCredentials, StaticKeys};
use crate::{
    config::ConfigSource,
    constants::{DEFAULT_TIMEOUT, SESSION_DURATION_SECONDS, STS_GLOBAL_REGION},
};

/// Name reported by the static credentials provider inside the SDK
const STATIC_PROVIDER_NAME: &str = "StsgateStaticKeys";

/// Failure of a token exchange.
///
/// Every failure cause lands in the one variant; the original error stays
/// reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("{message}")]
    ExchangeFailure {
        message: String,
        summary: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ExchangeError {
    fn failure(err: anyhow::Error) -> Self {
        // Local config errors name files and variables; keep those out of the summary
        let summary = if err.downcast_ref::<Unconfigured>().is_some() {
            format!("{FAILURE_PREFIX}: {}", Unconfigured)
        } else {
            format!("{FAILURE_PREFIX}: {err:#}")
        };
        Self::ExchangeFailure {
            message: format!("{FAILURE_PREFIX}: {err:#}"),
            summary,
            source: err.into(),
        }
    }

    /// Failure description that is safe to hand to remote callers
    pub fn summary(&self) -> &str {
        match self {
            Self::ExchangeFailure { summary, .. } => summary,
        }
    }
}

const FAILURE_PREFIX: &str = "Error retrieving STS session token";

#[derive(Debug, Error)]
#[error("Failed to resolve static AWS credentials")]
struct Unconfigured;

/// Temporary credentials as handed back by a provider session
#[derive(Clone)]
pub struct ProviderCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: Option<DateTime>,
}

/// An open connection to a Security Token Service
#[async_trait]
pub trait StsSession: Send + Sync {
    async fn get_session_token(&self, duration_seconds: i32) -> Result<ProviderCredentials>;

    /// Release the session. Called exactly once by [`TokenExchange`].
    fn close(&mut self);
}

/// Opens [`StsSession`]s authenticated with a static key pair
pub trait StsConnector: Send + Sync + 'static {
    type Session: StsSession;

    fn open(&self, keys: &StaticKeys, region: &Region, timeout: Duration) -> Result<Self::Session>;
}

/// Closes the wrapped session when dropped, including on early return and
/// when the surrounding future is cancelled.
struct SessionGuard<S: StsSession> {
    session: S,
}

impl<S: StsSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: StsSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.close();
    }
}

/// Exchanges the configured long-lived keys for a session token
pub struct TokenExchange<C> {
    connector: C,
    config: ConfigSource,
    timeout: Duration,
}

impl<C: StsConnector> TokenExchange<C> {
    pub fn new(connector: C, config: ConfigSource) -> Self {
        Self {
            connector,
            config,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound on the remote call, enforced independently of the SDK's own timeouts
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Request a fresh session token valid for [`SESSION_DURATION_SECONDS`]
    pub async fn issue_session_token(&self) -> Result<SessionCredentials, ExchangeError> {
        self.exchange().await.map_err(|e| {
            info!("(issue_session_token) Unable to retrieve token: {e:#}");
            ExchangeError::failure(e)
        })
    }

    async fn exchange(&self) -> Result<SessionCredentials> {
        let keys = self
            .config
            .resolve_keys()
            .context(Unconfigured)?;

        info!(
            access_key_id = %keys.masked_access_key_id(),
            secret_access_key = REDACTED,
            "Requesting STS session token"
        );

        let region = Region::from_static(STS_GLOBAL_REGION);
        let session = SessionGuard {
            session: self
                .connector
                .open(&keys, &region, self.timeout)
                .context("Failed to open STS session")?,
        };

        let provided = tokio::time::timeout(
            self.timeout,
            session.get_session_token(SESSION_DURATION_SECONDS),
        )
        .await
        .map_err(|_| anyhow!("STS call timed out after {:?}", self.timeout))?
        .context("STS GetSessionToken call failed")?;

        if let Some(expiration) = provided.expiration {
            info!(
                "Session token expires at: {}",
                expiration
                    .fmt(Format::DateTime)
                    .unwrap_or_else(|_| "unknown".to_string())
            );
        }

        Ok(SessionCredentials::new(
            provided.access_key_id,
            provided.secret_access_key,
            provided.session_token,
        ))
    }
}

/// Connector backed by the AWS SDK
#[derive(Debug, Clone, Default)]
pub struct AwsStsConnector {
    http_client: Option<SharedHttpClient>,
}

impl AwsStsConnector {
    /// Route STS traffic through `http_client` instead of the SDK default
    pub fn with_http_client(http_client: impl HttpClient + 'static) -> Self {
        Self {
            http_client: Some(http_client.into_shared()),
        }
    }
}

impl StsConnector for AwsStsConnector {
    type Session = AwsStsSession;

    fn open(&self, keys: &StaticKeys, region: &Region, timeout: Duration) -> Result<AwsStsSession> {
        // Only the configured keys are used; no fallback to the ambient provider chain
        let credentials = StaticCredentials::new(
            keys.access_key_id(),
            keys.secret_access_key(),
            None,
            None,
            STATIC_PROVIDER_NAME,
        );

        let mut builder = StsConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(region.clone())
            .credentials_provider(credentials)
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            );
        if let Some(http_client) = &self.http_client {
            builder.set_http_client(Some(http_client.clone()));
        }
        let config = builder.build();

        debug!("Opened STS session for region: {}", region);
        Ok(AwsStsSession {
            client: Some(StsClient::from_conf(config)),
        })
    }
}

pub struct AwsStsSession {
    client: Option<StsClient>,
}

#[async_trait]
impl StsSession for AwsStsSession {
    async fn get_session_token(&self, duration_seconds: i32) -> Result<ProviderCredentials> {
        let client = self.client.as_ref().context("STS session already closed")?;

        debug!("Duration: {} seconds", duration_seconds);
        let response = client
            .get_session_token()
            .duration_seconds(duration_seconds)
            .send()
            .await
            .context("Failed to get session token")?;

        let sts_creds = response
            .credentials()
            .context("AWS STS returned no credentials")?;

        Ok(ProviderCredentials {
            access_key_id: sts_creds.access_key_id().to_string(),
            secret_access_key: sts_creds.secret_access_key().to_string(),
            session_token: sts_creds.session_token().to_string(),
            expiration: Some(*sts_creds.expiration()),
        })
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("Closed STS session");
        }
    }
}
