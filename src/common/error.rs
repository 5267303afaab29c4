use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Categorized failure codes shared by every TFVC error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TfvcErrorCode {
    /// Credentials were rejected by the server
    AuthenticationFailed,
    /// The user has no permission on the collection
    NotAuthorizedToAccess,
    /// The folder is not mapped in any TFVC workspace
    NotATfvcRepository,
    /// The server-side repository does not exist
    RepositoryNotFound,
    /// The path is outside every working folder mapping
    FileNotInMappings,
    /// The path is not part of the workspace
    FileNotInWorkspace,
    /// The TF tool (or its runtime) could not be found
    NotFound,
    /// The configured tool location is not a file
    NotAFile,
    /// No tool location was configured
    LocationMissing,
    /// The installed tool is older than the supported minimum
    MinVersionWarning,
    /// The tool's configuration file is unreadable
    BadConfig,
    /// The tool could not create its standard input pipe
    PipeCreationFailed,
    /// The tool binary is not the English language build
    WrongLocale,
    /// Non-zero exit that matched no known pattern
    ExecutionFailed,
    /// Tool output could not be parsed
    ParseFailed,
    /// The command was abandoned by a dispose
    Cancelled,
    /// The command exceeded the configured timeout
    Timeout,
    /// Bad settings
    ConfigInvalid,
    /// Anything else
    Internal,
}

impl fmt::Display for TfvcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TfvcErrorCode::AuthenticationFailed => "AuthenticationFailed",
            TfvcErrorCode::NotAuthorizedToAccess => "NotAuthorizedToAccess",
            TfvcErrorCode::NotATfvcRepository => "NotATfvcRepository",
            TfvcErrorCode::RepositoryNotFound => "RepositoryNotFound",
            TfvcErrorCode::FileNotInMappings => "FileNotInMappings",
            TfvcErrorCode::FileNotInWorkspace => "FileNotInWorkspace",
            TfvcErrorCode::NotFound => "NotFound",
            TfvcErrorCode::NotAFile => "NotAFile",
            TfvcErrorCode::LocationMissing => "LocationMissing",
            TfvcErrorCode::MinVersionWarning => "MinVersionWarning",
            TfvcErrorCode::BadConfig => "BadConfig",
            TfvcErrorCode::PipeCreationFailed => "PipeCreationFailed",
            TfvcErrorCode::WrongLocale => "WrongLocale",
            TfvcErrorCode::ExecutionFailed => "ExecutionFailed",
            TfvcErrorCode::ParseFailed => "ParseFailed",
            TfvcErrorCode::Cancelled => "Cancelled",
            TfvcErrorCode::Timeout => "Timeout",
            TfvcErrorCode::ConfigInvalid => "ConfigInvalid",
            TfvcErrorCode::Internal => "Internal",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum TfvcError {
    #[error("TF command '{command}' failed: {message}")]
    CommandError {
        message: String,
        code: TfvcErrorCode,
        command: String,
        exit_code: Option<i32>,
        stdout: Option<String>,
        stderr: Option<String>,
    },

    #[error("TF command line tool unavailable: {message}")]
    ToolNotFound {
        message: String,
        code: TfvcErrorCode,
        path: Option<PathBuf>,
    },

    #[error("TF version {found} is below the minimum supported version {minimum}")]
    MinVersion { found: String, minimum: String },

    #[error("Failed to parse '{command}' output: {message}")]
    ParseError {
        message: String,
        command: String,
        #[source]
        source: Option<roxmltree::Error>,
    },

    #[error("Failed to run the TF process: {message}")]
    ProcessError {
        message: String,
        command: Option<String>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File watch error: {message}")]
    WatchError {
        message: String,
        #[source]
        source: Option<notify::Error>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl TfvcError {
    pub fn command_error(
        message: impl Into<String>,
        code: TfvcErrorCode,
        command: impl Into<String>,
    ) -> Self {
        Self::CommandError {
            message: message.into(),
            code,
            command: command.into(),
            exit_code: None,
            stdout: None,
            stderr: None,
        }
    }

    /// Command failure that keeps the raw process output for diagnostics.
    pub fn command_error_with_output(
        message: impl Into<String>,
        code: TfvcErrorCode,
        command: impl Into<String>,
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandError {
            message: message.into(),
            code,
            command: command.into(),
            exit_code: Some(exit_code),
            stdout: Some(stdout.into()),
            stderr: Some(stderr.into()),
        }
    }

    pub fn tool_not_found(
        message: impl Into<String>,
        code: TfvcErrorCode,
        path: Option<PathBuf>,
    ) -> Self {
        Self::ToolNotFound {
            message: message.into(),
            code,
            path,
        }
    }

    pub fn min_version(found: impl Into<String>, minimum: impl Into<String>) -> Self {
        Self::MinVersion {
            found: found.into(),
            minimum: minimum.into(),
        }
    }

    pub fn parse_error(message: impl Into<String>, command: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            command: command.into(),
            source: None,
        }
    }

    pub fn xml_error(command: impl Into<String>, source: roxmltree::Error) -> Self {
        Self::ParseError {
            message: "invalid XML document".to_string(),
            command: command.into(),
            source: Some(source),
        }
    }

    pub fn process_error(message: impl Into<String>, command: Option<String>) -> Self {
        Self::ProcessError {
            message: message.into(),
            command,
            source: None,
        }
    }

    pub fn process_error_with_source(
        message: impl Into<String>,
        command: Option<String>,
        source: std::io::Error,
    ) -> Self {
        Self::ProcessError {
            message: message.into(),
            command,
            source: Some(source),
        }
    }

    pub fn config_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::ConfigError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            path,
            source: Some(Box::new(source)),
        }
    }

    pub fn watch_error(message: impl Into<String>, source: notify::Error) -> Self {
        Self::WatchError {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Categorized code for this error
    pub fn code(&self) -> TfvcErrorCode {
        match self {
            TfvcError::CommandError { code, .. } => *code,
            TfvcError::ToolNotFound { code, .. } => *code,
            TfvcError::MinVersion { .. } => TfvcErrorCode::MinVersionWarning,
            TfvcError::ParseError { .. } => TfvcErrorCode::ParseFailed,
            TfvcError::ProcessError { source, .. } => match source {
                Some(e) if e.kind() == std::io::ErrorKind::NotFound => TfvcErrorCode::NotFound,
                Some(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    TfvcErrorCode::PipeCreationFailed
                }
                _ => TfvcErrorCode::ExecutionFailed,
            },
            TfvcError::ConfigError { .. } => TfvcErrorCode::ConfigInvalid,
            TfvcError::WatchError { .. } => TfvcErrorCode::Internal,
            TfvcError::Cancelled => TfvcErrorCode::Cancelled,
            TfvcError::Timeout { .. } => TfvcErrorCode::Timeout,
            TfvcError::InternalError { .. } => TfvcErrorCode::Internal,
        }
    }

    /// Name of the TF command that produced this error, if any
    pub fn command(&self) -> Option<&str> {
        match self {
            TfvcError::CommandError { command, .. } | TfvcError::ParseError { command, .. } => {
                Some(command)
            }
            TfvcError::ProcessError { command, .. } => command.as_deref(),
            _ => None,
        }
    }

    pub fn stderr(&self) -> Option<&str> {
        match self {
            TfvcError::CommandError { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }

    pub fn stdout(&self) -> Option<&str> {
        match self {
            TfvcError::CommandError { stdout, .. } => stdout.as_deref(),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TfvcError::CommandError { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    /// The folder is not usable with TFVC; callers treat this as "feature unavailable".
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.code(),
            TfvcErrorCode::NotATfvcRepository | TfvcErrorCode::FileNotInMappings
        )
    }

    /// The user has to sign in (again) before retrying.
    pub fn needs_sign_in(&self) -> bool {
        matches!(
            self.code(),
            TfvcErrorCode::AuthenticationFailed | TfvcErrorCode::NotAuthorizedToAccess
        )
    }

    /// Failures that mean the tool itself is missing, too old or misconfigured.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.code(),
            TfvcErrorCode::NotFound
                | TfvcErrorCode::NotAFile
                | TfvcErrorCode::LocationMissing
                | TfvcErrorCode::MinVersionWarning
        )
    }
}

impl From<roxmltree::Error> for TfvcError {
    fn from(error: roxmltree::Error) -> Self {
        Self::xml_error("status", error)
    }
}

impl From<notify::Error> for TfvcError {
    fn from(error: notify::Error) -> Self {
        Self::watch_error("Failed to watch the workspace", error)
    }
}

impl From<serde_yaml::Error> for TfvcError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config_error_with_source("YAML parsing failed", None, error)
    }
}

impl From<validator::ValidationErrors> for TfvcError {
    fn from(error: validator::ValidationErrors) -> Self {
        Self::config_error_with_source("Settings validation failed", None, error)
    }
}
