use super::command::TfvcCommand;
use super::commands::{Add, Checkin, FindWorkspace, GetFileContent, GetVersion, Status, Undo};
use crate::common::error::TfvcError;
use crate::common::result::TfvcResult;
use crate::domain::entities::pending_change::PendingChange;
use crate::domain::entities::workspace::TfvcWorkspace;
use crate::domain::value_objects::server_context::ServerContext;
use crate::domain::value_objects::tf_tool::TfTool;
use crate::domain::value_objects::tfvc_version::TfvcVersion;
use crate::infrastructure::process::TfCommandRunner;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Forces English output from the JVM client
const JAVA_ARGS_VARIABLE: &str = "TF_ADDITIONAL_JAVA_ARGS";
const JAVA_ARGS_VALUE: &str = "-Duser.country=US -Duser.language=en";
const NO_TELEMETRY_VARIABLE: &str = "TF_NOTELEMETRY";

/// Where the pending-change model gets its data from
#[async_trait]
pub trait PendingChangeSource: Send + Sync {
    /// Full list of pending and candidate changes (folders excluded)
    async fn get_status(&self) -> TfvcResult<Vec<PendingChange>>;

    /// Content of `item` at `version`; empty when the item does not exist there
    async fn get_file_content(&self, item: &str, version: Option<&str>) -> TfvcResult<String>;
}

/// Workspace-bound facade over the TF commands.
///
/// Every call goes through the shared [`TfCommandRunner`], so commands
/// issued by one repository (or several sharing a runner) never overlap.
pub struct Repository {
    tool: TfTool,
    runner: Arc<TfCommandRunner>,
    root: PathBuf,
    server_context: Option<ServerContext>,
    environment: HashMap<String, String>,
    restrict_workspace: bool,
    version_checked: AtomicBool,
}

impl Repository {
    pub fn new(tool: TfTool, runner: Arc<TfCommandRunner>, root: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            runner,
            root: root.into(),
            server_context: None,
            environment: HashMap::new(),
            restrict_workspace: false,
            version_checked: AtomicBool::new(false),
        }
    }

    pub fn with_server_context(mut self, context: Option<ServerContext>) -> Self {
        self.server_context = context;
        self
    }

    /// Extra environment for every command; wins over everything else
    pub fn with_environment(mut self, environment: HashMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_restrict_workspace(mut self, restrict: bool) -> Self {
        self.restrict_workspace = restrict;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tool(&self) -> &TfTool {
        &self.tool
    }

    pub fn server_context(&self) -> Option<&ServerContext> {
        self.server_context.as_ref()
    }

    /// Run a command through the runner and parse its output with the
    /// variant-specific parser.
    pub async fn run_command<C: TfvcCommand>(&self, command: &C) -> TfvcResult<C::Output> {
        let is_exe = self.tool.is_exe();
        let args = if is_exe {
            command.exe_arguments()
        } else {
            command.arguments()
        };

        let mut config = command.options();
        if config.working_directory.is_none() {
            config.working_directory = Some(self.root.clone());
        }
        config.environment_variables = self.command_environment(config.environment_variables);

        let result = self.runner.run(&self.tool, &args, &config).await?;
        if is_exe {
            command.parse_exe_output(&result)
        } else {
            command.parse_output(&result)
        }
    }

    /// Base variables, then the proxy, then the command's own variables,
    /// then the repository's; later layers win.
    fn command_environment(&self, command_env: HashMap<String, String>) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert(JAVA_ARGS_VARIABLE.to_string(), JAVA_ARGS_VALUE.to_string());
        env.insert(NO_TELEMETRY_VARIABLE.to_string(), "TRUE".to_string());
        if let Some(proxy) = self.tool.proxy.as_deref().filter(|p| !p.is_empty()) {
            env.insert("HTTP_PROXY".to_string(), proxy.to_string());
            env.insert("HTTPS_PROXY".to_string(), proxy.to_string());
        }
        env.extend(command_env);
        env.extend(self.environment.clone());
        env
    }

    /// Query the tool version and compare it with the variant's minimum.
    ///
    /// Runs at most once per repository; later calls return `Ok(None)`.
    /// A banner without a version is accepted.
    pub async fn check_version(&self) -> TfvcResult<Option<TfvcVersion>> {
        if self.version_checked.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }

        let version = self.run_command(&GetVersion::new()).await?;
        match &version {
            Some(found) if *found < self.tool.min_version => {
                warn!(
                    "TF version {} is older than the supported minimum {}",
                    found, self.tool.min_version
                );
                return Err(TfvcError::min_version(
                    found.to_string(),
                    self.tool.min_version.to_string(),
                ));
            }
            Some(found) => info!("TF version {}", found),
            None => warn!("Could not determine the TF version; skipping the version check"),
        }
        Ok(version)
    }

    pub async fn find_workspace(&self, local_path: &Path) -> TfvcResult<TfvcWorkspace> {
        self.run_command(
            &FindWorkspace::new(local_path)
                .restrict_workspace(self.restrict_workspace)
                .with_server_context(self.server_context.clone()),
        )
        .await
    }

    pub async fn get_status(&self, ignore_folders: bool) -> TfvcResult<Vec<PendingChange>> {
        self.run_command(
            &Status::new()
                .with_server_context(self.server_context.clone())
                .ignore_folders(ignore_folders),
        )
        .await
    }

    pub async fn add(&self, paths: Vec<PathBuf>) -> TfvcResult<Vec<PathBuf>> {
        self.run_command(&Add::new(paths).with_server_context(self.server_context.clone()))
            .await
    }

    pub async fn undo(&self, paths: Vec<PathBuf>) -> TfvcResult<Vec<PathBuf>> {
        self.run_command(&Undo::new(paths).with_server_context(self.server_context.clone()))
            .await
    }

    pub async fn checkin(
        &self,
        paths: Vec<PathBuf>,
        comment: &str,
        work_items: Vec<u32>,
    ) -> TfvcResult<u64> {
        self.run_command(
            &Checkin::new(paths)
                .with_server_context(self.server_context.clone())
                .with_comment(comment)
                .with_work_items(work_items),
        )
        .await
    }

    /// File content at `version`; missing items yield empty content
    pub async fn get_file_content(&self, item: &str, version: Option<&str>) -> TfvcResult<String> {
        self.run_command(
            &GetFileContent::new(item)
                .with_server_context(self.server_context.clone())
                .with_version(version.map(str::to_string))
                .ignore_not_found(true),
        )
        .await
    }
}

#[async_trait]
impl PendingChangeSource for Repository {
    async fn get_status(&self) -> TfvcResult<Vec<PendingChange>> {
        Repository::get_status(self, true).await
    }

    async fn get_file_content(&self, item: &str, version: Option<&str>) -> TfvcResult<String> {
        Repository::get_file_content(self, item, version).await
    }
}
