use crate::common::result::TfvcResult;
use crate::domain::value_objects::server_context::ServerContext;
use crate::infrastructure::process::{ArgumentBuilder, ExecutionResult};
use crate::infrastructure::tfvc::command::TfvcCommand;
use crate::infrastructure::tfvc::command_helper::process_errors;

/// Print the content of a file at a version: `print` on the JVM client,
/// `view` on tf.exe.
#[derive(Debug, Clone)]
pub struct GetFileContent {
    server_context: Option<ServerContext>,
    path: String,
    version_spec: Option<String>,
    ignore_not_found: bool,
}

impl GetFileContent {
    /// `path` may be a local path or a server path (`$/...`)
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            server_context: None,
            path: path.into(),
            version_spec: None,
            ignore_not_found: false,
        }
    }

    pub fn with_server_context(mut self, context: Option<ServerContext>) -> Self {
        self.server_context = context;
        self
    }

    /// Version spec such as `C123` (changeset) or `T` (latest)
    pub fn with_version(mut self, version_spec: Option<String>) -> Self {
        self.version_spec = version_spec.filter(|v| !v.is_empty());
        self
    }

    /// Return empty content instead of failing when the item does not exist
    /// at that version
    pub fn ignore_not_found(mut self, ignore: bool) -> Self {
        self.ignore_not_found = ignore;
        self
    }

    fn build(&self, command: &str) -> ArgumentBuilder {
        let mut builder =
            ArgumentBuilder::new(command).with_server_context(self.server_context.as_ref());
        builder.add(self.path.as_str());
        if let Some(version) = &self.version_spec {
            builder.add_switch_with_value("version", Some(version.as_str()), false);
        }
        builder
    }

    fn parse(&self, command: &str, result: &ExecutionResult) -> TfvcResult<String> {
        if self.ignore_not_found && is_not_found(result) {
            return Ok(String::new());
        }
        process_errors(command, result, true)?;
        Ok(result.stdout.clone())
    }
}

fn is_not_found(result: &ExecutionResult) -> bool {
    (result.exit_code == 1 || result.exit_code == 100)
        && (result.stderr.contains("does not exist at the specified version")
            || result.stderr.contains("No file matches"))
}

impl TfvcCommand for GetFileContent {
    type Output = String;

    fn arguments(&self) -> ArgumentBuilder {
        self.build("print")
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        self.build("view")
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        self.parse("print", result)
    }

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        self.parse("view", result)
    }
}
