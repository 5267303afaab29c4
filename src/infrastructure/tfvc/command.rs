use crate::common::result::TfvcResult;
use crate::infrastructure::process::{ArgumentBuilder, ExecutionConfig, ExecutionResult};

/// A typed TF command: how to build its arguments and how to read its output.
///
/// Commands are stateless request objects; one is created per invocation.
/// The `exe_*` variants default to the JVM client behaviour and are only
/// overridden where `tf.exe` takes different arguments or prints different
/// output.
pub trait TfvcCommand: Send + Sync {
    /// Parsed result of the command
    type Output: Send;

    /// Arguments for the JVM command line client
    fn arguments(&self) -> ArgumentBuilder;

    /// Arguments for `tf.exe`
    fn exe_arguments(&self) -> ArgumentBuilder {
        self.arguments()
    }

    /// Spawn options (working directory, extra environment)
    fn options(&self) -> ExecutionConfig {
        ExecutionConfig::default()
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output>;

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        self.parse_output(result)
    }
}
