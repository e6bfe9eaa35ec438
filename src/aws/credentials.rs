use anyhow::{Context, Result};
use ini::Ini;
use tokio::fs;
use tracing;

use super::SessionCredentials;
use crate::{config::write_private, constants::get_aws_credentials_path};

/// Save credentials to AWS credentials file
///
/// Only the three wire fields are written; no expiration is tracked for the
/// profile, so the AWS SDKs treat it as a plain static session.
pub async fn save_credentials(profile: &str, creds: &SessionCredentials) -> Result<()> {
    let path = get_aws_credentials_path().context("Failed to determine AWS credentials path")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut ini = if path.exists() {
        Ini::load_from_file(&path)
            .with_context(|| format!("Failed to read credentials file: {}", path.display()))?
    } else {
        Ini::new()
    };

    ini.with_section(Some(profile))
        .set("aws_access_key_id", creds.access_key_id())
        .set("aws_secret_access_key", creds.secret_access_key())
        .set("aws_session_token", creds.session_token());

    write_private(&path, &ini)
        .await
        .context("Failed to write credentials file")?;

    tracing::info!("Credentials saved to profile: {}", profile);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn with_credentials_file<F: FnOnce(&std::path::Path)>(f: F) {
        let original = env::var("AWS_SHARED_CREDENTIALS_FILE").ok();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".aws").join("credentials");

        unsafe {
            env::set_var("AWS_SHARED_CREDENTIALS_FILE", &path);
        }
        f(path.as_path());

        unsafe {
            match original {
                Some(val) => env::set_var("AWS_SHARED_CREDENTIALS_FILE", val),
                None => env::remove_var("AWS_SHARED_CREDENTIALS_FILE"),
            }
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_save_credentials_writes_profile() {
        let original = env::var("AWS_SHARED_CREDENTIALS_FILE").ok();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".aws").join("credentials");
        unsafe {
            env::set_var("AWS_SHARED_CREDENTIALS_FILE", &path);
        }

        let creds = SessionCredentials::new("ASIA_TMP", "SECRET_TMP", "TOKEN_ABC");
        save_credentials("mqtt", &creds).await.unwrap();

        let ini = Ini::load_from_file(&path).unwrap();
        let section = ini.section(Some("mqtt")).unwrap();
        assert_eq!(section.get("aws_access_key_id"), Some("ASIA_TMP"));
        assert_eq!(section.get("aws_secret_access_key"), Some("SECRET_TMP"));
        assert_eq!(section.get("aws_session_token"), Some("TOKEN_ABC"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        unsafe {
            match original {
                Some(val) => env::set_var("AWS_SHARED_CREDENTIALS_FILE", val),
                None => env::remove_var("AWS_SHARED_CREDENTIALS_FILE"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_save_credentials_keeps_other_profiles() {
        with_credentials_file(|path| {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(
                path,
                "[default]\naws_access_key_id = AKIA_LONG\naws_secret_access_key = SECRET_LONG\n",
            )
            .unwrap();

            let runtime = tokio::runtime::Runtime::new().unwrap();
            let creds = SessionCredentials::new("ASIA_TMP", "SECRET_TMP", "TOKEN_ABC");
            runtime
                .block_on(save_credentials("session", &creds))
                .unwrap();

            let ini = Ini::load_from_file(path).unwrap();
            assert_eq!(
                ini.section(Some("default")).unwrap().get("aws_access_key_id"),
                Some("AKIA_LONG")
            );
            assert_eq!(
                ini.section(Some("session"))
                    .unwrap()
                    .get("aws_session_token"),
                Some("TOKEN_ABC")
            );
        });
    }

    #[test]
    #[serial]
    fn test_save_credentials_leaves_unreadable_file_untouched() {
        with_credentials_file(|path| {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            let contents = "[default]\naws_access_key_id = AKIA_LONG\n[broken";
            std::fs::write(path, contents).unwrap();

            let runtime = tokio::runtime::Runtime::new().unwrap();
            let creds = SessionCredentials::new("ASIA_TMP", "SECRET_TMP", "TOKEN_ABC");
            let err = runtime
                .block_on(save_credentials("session", &creds))
                .unwrap_err();

            assert!(err.to_string().contains("Failed to read credentials file"));
            assert_eq!(std::fs::read_to_string(path).unwrap(), contents);
        });
    }
}
