use crate::common::error::TfvcError;
use crate::common::result::TfvcResult;
use crate::domain::entities::settings::TfvcSettings;
use crate::domain::value_objects::server_context::{Credentials, ServerContext};
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::{debug, info};
use validator::Validate;

/// Settings file names looked up at the repository root, in order
pub const SETTINGS_FILE_NAMES: [&str; 2] = [".tfvc.yml", ".tfvc.yaml"];

/// Environment variable overriding `location`
pub const LOCATION_VARIABLE: &str = "TFVC_LOCATION";
/// Environment variable overriding `proxy`
pub const PROXY_VARIABLE: &str = "TFVC_PROXY";
/// Environment variable holding the password or personal access token
pub const PASSWORD_VARIABLE: &str = "TFVC_PASSWORD";

/// Loads `.tfvc.yml` and layers environment overrides on top
pub struct SettingsStore {
    validate_on_read: bool,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            validate_on_read: true,
        }
    }
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// First settings file present in `root`
    pub fn discover(&self, root: &Path) -> Option<PathBuf> {
        SETTINGS_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Parse and validate one settings file
    pub async fn read_settings(&self, path: &Path) -> TfvcResult<TfvcSettings> {
        let contents = async_fs::read_to_string(path).await.map_err(|e| {
            TfvcError::config_error_with_source(
                format!("Failed to read {}", path.display()),
                Some(path.to_path_buf()),
                e,
            )
        })?;

        // An empty file is a valid, empty configuration
        let settings: TfvcSettings = if contents.trim().is_empty() {
            TfvcSettings::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                TfvcError::config_error_with_source(
                    format!("Invalid YAML in {}", path.display()),
                    Some(path.to_path_buf()),
                    e,
                )
            })?
        };

        if self.validate_on_read {
            settings.validate().map_err(|e| {
                TfvcError::config_error_with_source(
                    format!("Invalid settings in {}", path.display()),
                    Some(path.to_path_buf()),
                    e,
                )
            })?;
        }
        Ok(settings)
    }

    /// Settings for `root`: the discovered file (or defaults) with
    /// `TFVC_LOCATION` / `TFVC_PROXY` applied.
    pub async fn load(&self, root: &Path) -> TfvcResult<TfvcSettings> {
        let settings = match self.discover(root) {
            Some(path) => {
                info!("Loading settings from {}", path.display());
                self.read_settings(&path).await?
            }
            None => {
                debug!("No settings file in {}", root.display());
                TfvcSettings::default()
            }
        };

        let settings = apply_overrides(settings, |key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }
}

/// Apply environment overrides using `lookup` to read variables
pub fn apply_overrides<F>(settings: TfvcSettings, lookup: F) -> TfvcSettings
where
    F: Fn(&str) -> Option<String>,
{
    let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let mut overrides = TfvcSettings::new();
    if let Some(location) = present(LOCATION_VARIABLE) {
        overrides.location = Some(PathBuf::from(location));
    }
    if let Some(proxy) = present(PROXY_VARIABLE) {
        overrides.proxy = Some(proxy);
    }
    settings.merge(overrides)
}

/// Server context from the collection URL and username in `settings`; the
/// password is read through `lookup` from `TFVC_PASSWORD` only.
pub fn server_context<F>(settings: &TfvcSettings, lookup: F) -> TfvcResult<Option<ServerContext>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(url) = settings.collection_url.as_deref() else {
        return Ok(None);
    };

    let context = ServerContext::parse(url).map_err(|e| {
        TfvcError::config_error_with_source(format!("Invalid collection URL '{}'", url), None, e)
    })?;

    let context = match (&settings.username, lookup(PASSWORD_VARIABLE)) {
        (Some(username), Some(password)) => {
            context.with_credentials(Credentials::new(username.clone(), password))
        }
        _ => context,
    };
    Ok(Some(context))
}
