use super::argument_builder::ArgumentBuilder;
use super::output::strip_echoed_command_line;
use crate::common::error::TfvcError;
use crate::common::result::{OptionExt, TfvcResult};
use crate::domain::value_objects::tf_tool::TfTool;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Argument that makes the tool read its real command line from stdin
const STDIN_ARGUMENT: &str = "@";

/// Spawn options for one TF invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Working directory for the process
    pub working_directory: Option<PathBuf>,

    /// Environment variables layered over the inherited environment
    pub environment_variables: HashMap<String, String>,
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_environment_variable(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.environment_variables.insert(key.into(), value.into());
        self
    }

    /// Add variables; later values win per key
    pub fn with_environment_variables(mut self, vars: HashMap<String, String>) -> Self {
        self.environment_variables.extend(vars);
        self
    }
}

/// Raw outcome of one TF invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub execution_time_ms: u64,
}

impl ExecutionResult {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            execution_time_ms: 0,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Pre-spawned process waiting for its command on stdin
struct WarmProcess {
    child: Child,
    tool_path: PathBuf,
    working_directory: Option<PathBuf>,
}

impl WarmProcess {
    fn matches(&self, tool: &TfTool, config: &ExecutionConfig) -> bool {
        self.tool_path == tool.path && self.working_directory == config.working_directory
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

/// Runs TF commands through a single reusable process slot.
///
/// Each invocation is serviced by a process that was spawned ahead of time
/// (when its tool path and working directory still match) and a fresh one is
/// spawned for the next call. The tool reads one command from stdin per
/// process lifetime, so a process is never reused twice. `run` holds the slot
/// for the whole invocation, which serializes callers.
pub struct TfCommandRunner {
    slot: Mutex<Option<WarmProcess>>,
    timeout: Option<Duration>,
    prewarm: bool,
    disposed: watch::Sender<u64>,
}

impl Default for TfCommandRunner {
    fn default() -> Self {
        let (disposed, _) = watch::channel(0);
        Self {
            slot: Mutex::new(None),
            timeout: None,
            prewarm: true,
            disposed,
        }
    }
}

impl TfCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill and fail commands that run longer than `timeout_secs`
    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout = timeout_secs.map(Duration::from_secs);
        self
    }

    /// Disable spawning the next process ahead of time
    pub fn with_prewarm(mut self, prewarm: bool) -> Self {
        self.prewarm = prewarm;
        self
    }

    /// Execute `args` with `tool` and collect exit code, stdout and stderr.
    ///
    /// Non-zero exit codes are returned as-is; interpreting them is up to
    /// the caller.
    pub async fn run(
        &self,
        tool: &TfTool,
        args: &ArgumentBuilder,
        config: &ExecutionConfig,
    ) -> TfvcResult<ExecutionResult> {
        let mut disposed = self.disposed.subscribe();
        let mut slot = self.slot.lock().await;
        let start_time = Instant::now();
        let command = args.command().to_string();

        debug!(tool = %tool.path.display(), "Running tf {}", args);

        let mut child = match slot.take() {
            Some(mut warm) => {
                if warm.matches(tool, config) && warm.is_alive() {
                    warm.child
                } else {
                    debug!("Discarding cached TF process");
                    let _ = warm.child.start_kill();
                    Self::spawn(tool, config)?
                }
            }
            None => Self::spawn(tool, config)?,
        };

        if self.prewarm {
            match Self::spawn(tool, config) {
                Ok(next) => {
                    *slot = Some(WarmProcess {
                        child: next,
                        tool_path: tool.path.clone(),
                        working_directory: config.working_directory.clone(),
                    })
                }
                Err(e) => warn!("Failed to pre-spawn the next TF process: {}", e),
            }
        }

        let mut stdin = child
            .stdin
            .take()
            .ok_or_internal_error("TF process was spawned without standard input")?;
        match stdin.write_all(args.build_command_line().as_bytes()).await {
            Ok(()) => {}
            // The tool exited before reading; its output still says why
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!("TF process closed stdin before reading the command line");
            }
            Err(e) => {
                return Err(TfvcError::process_error_with_source(
                    "Failed to write the command line to the TF process",
                    Some(command.clone()),
                    e,
                ))
            }
        }
        // Closing stdin tells the tool the command is complete
        drop(stdin);

        let output = tokio::select! {
            output = Self::wait_for_completion(child, self.timeout, &command) => output?,
            _ = disposed.changed() => {
                info!("TF process disposed while running '{}'", command);
                return Err(TfvcError::Cancelled);
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = if tool.is_exe() {
            strip_echoed_command_line(&stdout).to_string()
        } else {
            stdout.into_owned()
        };
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let execution_time_ms = start_time.elapsed().as_millis() as u64;

        debug!(
            exit_code,
            execution_time_ms, "tf {} finished", command
        );

        Ok(ExecutionResult {
            exit_code,
            stdout,
            stderr,
            execution_time_ms,
        })
    }

    /// Kill the cached process and abandon any command in flight.
    ///
    /// The runner stays usable; the next `run` spawns a fresh process.
    pub async fn dispose(&self) {
        self.disposed.send_modify(|generation| *generation += 1);
        let mut slot = self.slot.lock().await;
        if let Some(mut warm) = slot.take() {
            if let Err(e) = warm.child.kill().await {
                warn!("Failed to kill cached TF process: {}", e);
            }
        }
    }

    /// Whether a pre-spawned process is waiting for the next command
    pub async fn has_warm_process(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    fn spawn(tool: &TfTool, config: &ExecutionConfig) -> TfvcResult<Child> {
        let mut cmd = Command::new(&tool.path);
        cmd.arg(STDIN_ARGUMENT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &config.working_directory {
            cmd.current_dir(dir);
        }
        cmd.envs(&config.environment_variables);

        cmd.spawn().map_err(|e| {
            TfvcError::process_error_with_source(
                format!("Failed to start '{}'", tool.path.display()),
                None,
                e,
            )
        })
    }

    async fn wait_for_completion(
        child: Child,
        limit: Option<Duration>,
        command: &str,
    ) -> TfvcResult<Output> {
        let waited = match limit {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("tf {} timed out after {:?}", command, limit);
                    return Err(TfvcError::timeout(limit.as_secs()));
                }
            },
            None => child.wait_with_output().await,
        };

        waited.map_err(|e| {
            TfvcError::process_error_with_source(
                "Failed to collect TF process output",
                Some(command.to_string()),
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_config_layers_environment() {
        let mut overrides = HashMap::new();
        overrides.insert("A".to_string(), "2".to_string());
        let config = ExecutionConfig::new()
            .with_working_directory("/ws")
            .with_environment_variable("A", "1")
            .with_environment_variable("B", "1")
            .with_environment_variables(overrides);

        assert_eq!(config.working_directory, Some(PathBuf::from("/ws")));
        assert_eq!(config.environment_variables.get("A"), Some(&"2".to_string()));
        assert_eq!(config.environment_variables.get("B"), Some(&"1".to_string()));
    }

    #[test]
    fn test_execution_result_success() {
        assert!(ExecutionResult::new(0, "out", "").success());
        assert!(!ExecutionResult::new(100, "", "err").success());
    }

    #[tokio::test]
    async fn test_missing_tool_fails_to_spawn() {
        let runner = TfCommandRunner::new();
        let tool = TfTool::new("/definitely/not/here/tf");
        let result = runner
            .run(&tool, &ArgumentBuilder::new("status"), &ExecutionConfig::new())
            .await;

        let error = result.unwrap_err();
        assert_eq!(
            error.code(),
            crate::common::error::TfvcErrorCode::NotFound
        );
        assert!(!runner.has_warm_process().await);
    }

    #[cfg(unix)]
    mod shell {
        use super::*;
        use crate::domain::value_objects::tf_tool::ToolVariant;
        use std::sync::Arc;
        use tempfile::TempDir;

        /// Working directory whose `@` file is the script `sh @` runs
        fn script_dir(script: &str) -> TempDir {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("@"), script).unwrap();
            dir
        }

        fn shell() -> TfTool {
            TfTool::new("/bin/sh")
        }

        #[tokio::test]
        async fn test_command_line_is_written_to_stdin() {
            let dir = script_dir("read line\necho \"got: $line\"\n");
            let runner = TfCommandRunner::new();
            let config = ExecutionConfig::new().with_working_directory(dir.path());

            let mut args = ArgumentBuilder::new("status");
            args.add("my file.txt");
            let result = runner.run(&shell(), &args, &config).await.unwrap();

            assert!(result.success());
            assert_eq!(result.stdout, "got: status -noprompt \"my file.txt\"\n");
            assert!(runner.has_warm_process().await);
        }

        #[tokio::test]
        async fn test_non_zero_exit_is_returned() {
            let dir = script_dir("echo out\necho oops >&2\nexit 3\n");
            let runner = TfCommandRunner::new().with_prewarm(false);
            let config = ExecutionConfig::new().with_working_directory(dir.path());

            let result = runner
                .run(&shell(), &ArgumentBuilder::new("add"), &config)
                .await
                .unwrap();

            assert_eq!(result.exit_code, 3);
            assert_eq!(result.stdout, "out\n");
            assert_eq!(result.stderr, "oops\n");
            assert!(!runner.has_warm_process().await);
        }

        #[tokio::test]
        async fn test_echoed_command_line_is_stripped_for_exe() {
            let dir = script_dir("read line\necho \"C:/ws>tf $line\"\necho payload\n");
            let runner = TfCommandRunner::new();
            let config = ExecutionConfig::new().with_working_directory(dir.path());
            let tool = shell().with_variant(ToolVariant::Executable);

            let result = runner
                .run(&tool, &ArgumentBuilder::new("status"), &config)
                .await
                .unwrap();

            assert_eq!(result.stdout, "payload\n");
        }

        #[tokio::test]
        async fn test_environment_is_passed_to_the_process() {
            let dir = script_dir("echo \"$TF_NOTELEMETRY\"\n");
            let runner = TfCommandRunner::new();
            let config = ExecutionConfig::new()
                .with_working_directory(dir.path())
                .with_environment_variable("TF_NOTELEMETRY", "TRUE");

            let result = runner
                .run(&shell(), &ArgumentBuilder::new("status"), &config)
                .await
                .unwrap();

            assert_eq!(result.stdout, "TRUE\n");
        }

        #[tokio::test]
        async fn test_changed_working_directory_respawns() {
            let first = script_dir("echo first\n");
            let second = script_dir("echo second\n");
            let runner = TfCommandRunner::new();

            let config = ExecutionConfig::new().with_working_directory(first.path());
            let result = runner
                .run(&shell(), &ArgumentBuilder::new("status"), &config)
                .await
                .unwrap();
            assert_eq!(result.stdout, "first\n");

            let config = ExecutionConfig::new().with_working_directory(second.path());
            let result = runner
                .run(&shell(), &ArgumentBuilder::new("status"), &config)
                .await
                .unwrap();
            assert_eq!(result.stdout, "second\n");
        }

        #[tokio::test]
        async fn test_exited_warm_process_is_replaced() {
            let dir = script_dir("echo done\n");
            let runner = TfCommandRunner::new();
            let config = ExecutionConfig::new().with_working_directory(dir.path());

            let first = runner
                .run(&shell(), &ArgumentBuilder::new("status"), &config)
                .await
                .unwrap();
            assert_eq!(first.stdout, "done\n");
            assert!(runner.has_warm_process().await);

            // the pre-spawned process runs the script without waiting for stdin
            tokio::time::sleep(Duration::from_millis(300)).await;

            let second = runner
                .run(&shell(), &ArgumentBuilder::new("status"), &config)
                .await
                .unwrap();
            assert!(second.success());
            assert_eq!(second.stdout, "done\n");
        }

        #[tokio::test]
        async fn test_timeout() {
            let dir = script_dir("sleep 5\n");
            let runner = TfCommandRunner::new().with_timeout(Some(1)).with_prewarm(false);
            let config = ExecutionConfig::new().with_working_directory(dir.path());

            let error = runner
                .run(&shell(), &ArgumentBuilder::new("status"), &config)
                .await
                .unwrap_err();
            assert!(matches!(error, TfvcError::Timeout { timeout_secs: 1 }));
        }

        #[tokio::test]
        async fn test_dispose_cancels_running_command() {
            let dir = script_dir("sleep 5\n");
            let runner = Arc::new(TfCommandRunner::new());
            let config = ExecutionConfig::new().with_working_directory(dir.path());

            let task = {
                let runner = Arc::clone(&runner);
                tokio::spawn(async move {
                    runner
                        .run(&shell(), &ArgumentBuilder::new("status"), &config)
                        .await
                })
            };

            tokio::time::sleep(Duration::from_millis(200)).await;
            runner.dispose().await;

            let result = task.await.unwrap();
            assert!(matches!(result, Err(TfvcError::Cancelled)));
            assert!(!runner.has_warm_process().await);
        }
    }
}
