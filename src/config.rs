use crate::{
    aws::StaticKeys,
    constants::{
        self, ACCESS_KEY_ID_ENV, ACCESS_KEY_ID_PROPERTY, SECRET_ACCESS_KEY_ENV,
        SECRET_ACCESS_KEY_PROPERTY,
    },
};
use anyhow::{Context, Result};
use dialoguer::{Input, Password, theme::ColorfulTheme};
use ini::Ini;
use std::{
    env,
    path::{Path, PathBuf},
};
use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

/// Where the static AWS keys come from.
///
/// Nothing is cached: every call to [`ConfigSource::resolve_keys`] re-reads the
/// environment and the properties file, so rotated keys take effect on the
/// next exchange without a restart.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    path: Option<PathBuf>,
}

impl ConfigSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Properties file in effect, explicit path first
    pub fn path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(constants::default_config_path)
    }

    /// Resolve the long-lived key pair. Environment variables win over the file.
    pub fn resolve_keys(&self) -> Result<StaticKeys> {
        let path = self.path();
        let properties = match &path {
            Some(path) => load_properties(path)?,
            None => None,
        };
        let location = path
            .as_deref()
            .map_or_else(|| "<no properties file>".to_string(), |p| p.display().to_string());

        let access_key_id = lookup(ACCESS_KEY_ID_ENV, ACCESS_KEY_ID_PROPERTY, properties.as_ref())
            .with_context(|| {
                format!("{ACCESS_KEY_ID_PROPERTY} is not configured (set {ACCESS_KEY_ID_ENV} or add it to {location})")
            })?;

        let secret_access_key =
            lookup(SECRET_ACCESS_KEY_ENV, SECRET_ACCESS_KEY_PROPERTY, properties.as_ref())
                .with_context(|| {
                    format!("{SECRET_ACCESS_KEY_PROPERTY} is not configured (set {SECRET_ACCESS_KEY_ENV} or add it to {location})")
                })?;

        Ok(StaticKeys::new(access_key_id, secret_access_key))
    }
}

fn load_properties(path: &Path) -> Result<Option<Ini>> {
    if !path.exists() {
        debug!("Properties file not found: {}", path.display());
        return Ok(None);
    }

    Ini::load_from_file(path)
        .map(Some)
        .with_context(|| format!("Failed to read properties file: {}", path.display()))
}

fn lookup(env_name: &str, property: &str, properties: Option<&Ini>) -> Option<String> {
    env::var(env_name).ok().or_else(|| {
        properties
            .and_then(|ini| ini.general_section().get(property))
            .map(str::to_string)
    })
}

/// Write both keys into the properties file, keeping any other entries
pub async fn save(path: &Path, access_key_id: &str, secret_access_key: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut ini = if path.exists() {
        Ini::load_from_file(path)
            .with_context(|| format!("Failed to read properties file: {}", path.display()))?
    } else {
        Ini::new()
    };

    ini.with_general_section()
        .set(ACCESS_KEY_ID_PROPERTY, access_key_id)
        .set(SECRET_ACCESS_KEY_PROPERTY, secret_access_key);

    write_private(path, &ini)
        .await
        .with_context(|| format!("Failed to write properties to {}", path.display()))
}

/// Write `ini` to `path`, readable by the owner only.
///
/// New files are created with mode 0600 and existing ones are narrowed to
/// 0600 before any byte of the new contents lands on disk.
pub(crate) async fn write_private(path: &Path, ini: &Ini) -> Result<()> {
    let mut contents = Vec::new();
    ini.write_to(&mut contents)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
    }

    file.write_all(&contents).await?;
    file.flush().await?;
    Ok(())
}

pub async fn configure_interactive(source: &ConfigSource) -> Result<()> {
    let path = source
        .path()
        .context("Failed to determine properties file path. Pass --config explicitly")?;

    println!("Configuring stsgate in {}", path.display());

    let existing_id = load_properties(&path)
        .ok()
        .flatten()
        .and_then(|ini| ini.general_section().get(ACCESS_KEY_ID_PROPERTY).map(str::to_string))
        .unwrap_or_default();

    if !existing_id.is_empty() {
        println!("Press Enter to keep the current access key id.");
    }
    println!();

    let theme = ColorfulTheme::default();

    let access_key_id = Input::<String>::with_theme(&theme)
        .with_prompt("AWS Access Key ID")
        .default(existing_id)
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("Access key id is required")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .context("Failed to read access key id")?;

    let secret_access_key = Password::with_theme(&theme)
        .with_prompt("AWS Secret Access Key")
        .interact()
        .context("Failed to read secret access key")?;

    save(&path, access_key_id.trim(), &secret_access_key).await?;

    println!("\nConfiguration saved successfully.");
    Ok(())
}
