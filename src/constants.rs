use std::{
    env,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    path::PathBuf,
    time::Duration,
};

use dirs;

/// Configuration directory name under `~/.config`
pub const CONFIG_DIR_NAME: &str = "stsgate";

/// Properties file holding the static AWS keys
pub const CONFIG_FILE_NAME: &str = "application.properties";

/// Overrides the properties file location
pub const CONFIG_FILE_ENV: &str = "STSGATE_CONFIG_FILE";

/// Property key of the long-lived access key id
pub const ACCESS_KEY_ID_PROPERTY: &str = "app.environment.accessKeyId";

/// Property key of the long-lived secret access key
pub const SECRET_ACCESS_KEY_PROPERTY: &str = "app.environment.secretAccessKey";

/// Environment variable that takes precedence over [`ACCESS_KEY_ID_PROPERTY`]
pub const ACCESS_KEY_ID_ENV: &str = "APP_ENVIRONMENT_ACCESSKEYID";

/// Environment variable that takes precedence over [`SECRET_ACCESS_KEY_PROPERTY`]
pub const SECRET_ACCESS_KEY_ENV: &str = "APP_ENVIRONMENT_SECRETACCESSKEY";

/// AWS configuration directory name
pub const AWS_CONFIG_DIR_NAME: &str = ".aws";

/// AWS shared credentials file name
pub const AWS_CREDENTIALS_FILE_NAME: &str = "credentials";

/// Validity window requested for every session token
pub const SESSION_DURATION_SECONDS: i32 = 3600;

/// Global STS partition endpoint (sts.amazonaws.com, signed for us-east-1)
pub const STS_GLOBAL_REGION: &str = "aws-global";

/// Default bound on a single STS exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default HTTP listen address
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8080));

/// Route serving freshly issued session credentials
pub const SESSION_TOKEN_ROUTE: &str = "/security/sts-session-token";

/// Liveness route
pub const HEALTH_ROUTE: &str = "/healthz";

/// Get the properties file path
/// Respects STSGATE_CONFIG_FILE environment variable if set
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| {
        home.join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    })
}

/// Get the AWS credentials file path
/// Respects AWS_SHARED_CREDENTIALS_FILE environment variable if set
pub fn get_aws_credentials_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("AWS_SHARED_CREDENTIALS_FILE") {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| {
        home.join(AWS_CONFIG_DIR_NAME)
            .join(AWS_CREDENTIALS_FILE_NAME)
    })
}
