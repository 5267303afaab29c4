use super::tfvc_version::TfvcVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Minimum version accepted for the Windows `tf.exe` client
pub const MIN_EXE_VERSION: &str = "14.102.0";
/// Minimum version accepted for the JVM-hosted command line client
pub const MIN_CLC_VERSION: &str = "14.0.4";

/// Which flavour of the TF command line client is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolVariant {
    /// Native `tf.exe` shipped with Visual Studio
    Executable,
    /// Team Explorer Everywhere command line client (JVM)
    JavaClient,
}

impl ToolVariant {
    /// Pick the variant from the file extension (`.exe` means the native client)
    pub fn from_path(path: &Path) -> Self {
        let is_exe = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("exe"))
            .unwrap_or(false);
        if is_exe {
            ToolVariant::Executable
        } else {
            ToolVariant::JavaClient
        }
    }

    pub fn min_version(&self) -> TfvcVersion {
        match self {
            ToolVariant::Executable => TfvcVersion::from_string(MIN_EXE_VERSION),
            ToolVariant::JavaClient => TfvcVersion::from_string(MIN_CLC_VERSION),
        }
    }
}

impl fmt::Display for ToolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolVariant::Executable => write!(f, "tf.exe"),
            ToolVariant::JavaClient => write!(f, "tf (CLC)"),
        }
    }
}

/// Resolved TF command line tool. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfTool {
    pub path: PathBuf,
    pub min_version: TfvcVersion,
    pub variant: ToolVariant,
    pub proxy: Option<String>,
}

impl TfTool {
    /// Build a handle for `path`, deriving the variant and minimum version from it
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let variant = ToolVariant::from_path(&path);
        Self {
            min_version: variant.min_version(),
            path,
            variant,
            proxy: None,
        }
    }

    /// Force a variant, e.g. for a wrapper script around `tf.exe`
    pub fn with_variant(mut self, variant: ToolVariant) -> Self {
        self.variant = variant;
        self.min_version = variant.min_version();
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn is_exe(&self) -> bool {
        self.variant == ToolVariant::Executable
    }
}
