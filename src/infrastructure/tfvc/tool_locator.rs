use crate::common::error::{TfvcError, TfvcErrorCode};
use crate::common::result::TfvcResult;
use crate::domain::entities::settings::TfvcSettings;
use crate::domain::value_objects::tf_tool::TfTool;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Resolves the TF command line tool once and hands out the cached handle
#[derive(Debug, Default)]
pub struct ToolLocator {
    explicit_path: Option<PathBuf>,
    settings: TfvcSettings,
    resolved: OnceLock<TfTool>,
}

impl ToolLocator {
    pub fn new(settings: TfvcSettings) -> Self {
        Self {
            explicit_path: None,
            settings,
            resolved: OnceLock::new(),
        }
    }

    /// A path that wins over the settings file
    pub fn with_explicit_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit_path = path;
        self
    }

    /// Find the tool and check that it is a file.
    ///
    /// Successful resolutions are cached for the lifetime of the locator;
    /// failures are not, so a fixed configuration can be picked up later.
    pub fn resolve(&self) -> TfvcResult<TfTool> {
        if let Some(tool) = self.resolved.get() {
            return Ok(tool.clone());
        }

        let tool = self.locate()?;
        info!(path = %tool.path.display(), variant = %tool.variant, "Using TF command line tool");
        Ok(self.resolved.get_or_init(|| tool).clone())
    }

    fn locate(&self) -> TfvcResult<TfTool> {
        let path = self
            .explicit_path
            .clone()
            .or_else(|| self.settings.location.clone())
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| {
                TfvcError::tool_not_found(
                    "The TF command line tool location is not configured",
                    TfvcErrorCode::LocationMissing,
                    None,
                )
            })?;

        debug!("Checking TF tool location {}", path.display());

        let metadata = std::fs::metadata(&path).map_err(|_| {
            TfvcError::tool_not_found(
                format!("The TF command line tool was not found at '{}'", path.display()),
                TfvcErrorCode::NotFound,
                Some(path.clone()),
            )
        })?;
        if !metadata.is_file() {
            return Err(TfvcError::tool_not_found(
                format!("'{}' is not a file", path.display()),
                TfvcErrorCode::NotAFile,
                Some(path),
            ));
        }

        Ok(TfTool::new(path).with_proxy(self.settings.proxy.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::tf_tool::ToolVariant;
    use tempfile::TempDir;

    #[test]
    fn test_missing_location() {
        let error = ToolLocator::new(TfvcSettings::new()).resolve().unwrap_err();
        assert_eq!(error.code(), TfvcErrorCode::LocationMissing);
        assert!(error.is_fatal());
    }

    #[test]
    fn test_location_must_exist() {
        let dir = TempDir::new().unwrap();
        let settings = TfvcSettings::new().with_location(dir.path().join("tf"));
        let error = ToolLocator::new(settings).resolve().unwrap_err();
        assert_eq!(error.code(), TfvcErrorCode::NotFound);
    }

    #[test]
    fn test_location_must_be_a_file() {
        let dir = TempDir::new().unwrap();
        let settings = TfvcSettings::new().with_location(dir.path());
        let error = ToolLocator::new(settings).resolve().unwrap_err();
        assert_eq!(error.code(), TfvcErrorCode::NotAFile);
    }

    #[test]
    fn test_resolves_variant_and_proxy() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("TF.EXE");
        std::fs::write(&exe, "").unwrap();

        let settings = TfvcSettings::new()
            .with_location(&exe)
            .with_proxy("http://proxy.local:8080");
        let tool = ToolLocator::new(settings).resolve().unwrap();

        assert_eq!(tool.path, exe);
        assert_eq!(tool.variant, ToolVariant::Executable);
        assert_eq!(tool.proxy.as_deref(), Some("http://proxy.local:8080"));
    }

    #[test]
    fn test_explicit_path_wins_and_is_cached() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("tf");
        std::fs::write(&explicit, "").unwrap();

        let locator = ToolLocator::new(TfvcSettings::new().with_location("/nowhere/tf"))
            .with_explicit_path(Some(explicit.clone()));
        let first = locator.resolve().unwrap();
        assert_eq!(first.variant, ToolVariant::JavaClient);

        std::fs::remove_file(&explicit).unwrap();
        assert_eq!(locator.resolve().unwrap(), first);
    }
}
