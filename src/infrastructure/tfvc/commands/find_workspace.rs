use crate::common::error::{TfvcError, TfvcErrorCode};
use crate::common::result::TfvcResult;
use crate::domain::entities::workspace::{TfvcWorkspace, WorkspaceMapping};
use crate::domain::value_objects::server_context::ServerContext;
use crate::infrastructure::process::output::split_into_lines;
use crate::infrastructure::process::{ArgumentBuilder, ExecutionConfig, ExecutionResult};
use crate::infrastructure::tfvc::command::TfvcCommand;
use crate::infrastructure::tfvc::command_helper::process_errors;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const CLOAKED_PREFIX: &str = "(cloaked)";

/// `tf workfold`: find the workspace that maps a local folder.
///
/// Output looks like:
///
/// ```text
/// ===========================================================
/// Workspace:  MyWorkspace
/// Collection: https://tfs.local/DefaultCollection
/// $/Project/Main: /home/me/src/main
/// (cloaked) $/Project/Main/bin:
/// ```
///
/// Anything above the `=` separator (warnings, banners) is ignored.
#[derive(Debug, Clone)]
pub struct FindWorkspace {
    local_path: PathBuf,
    restrict_workspace: bool,
    server_context: Option<ServerContext>,
}

impl FindWorkspace {
    pub fn new(local_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            restrict_workspace: false,
            server_context: None,
        }
    }

    /// Pick the team project from the mapping that contains the local path
    /// instead of the first mapping.
    pub fn restrict_workspace(mut self, restrict: bool) -> Self {
        self.restrict_workspace = restrict;
        self
    }

    pub fn with_server_context(mut self, context: Option<ServerContext>) -> Self {
        self.server_context = context;
        self
    }

    fn parse(&self, stdout: &str) -> TfvcResult<TfvcWorkspace> {
        let lines = split_into_lines(stdout, true, true);

        let mut name: Option<String> = None;
        let mut collection: Option<String> = None;
        let mut mappings = Vec::new();
        let mut in_content = false;

        for line in &lines {
            let line = line.trim();
            if !in_content {
                in_content = !line.is_empty() && line.chars().all(|c| c == '=');
                continue;
            }

            let lowered = line.to_lowercase();
            if lowered.starts_with("workspace") {
                name = value_after_colon(line);
            } else if lowered.starts_with("collection") {
                collection = value_after_colon(line);
            } else if let Some(mapping) = parse_mapping(line) {
                mappings.push(mapping);
            }
        }

        let (Some(name), Some(collection)) = (name, collection) else {
            return Err(TfvcError::command_error(
                format!(
                    "No workspace could be found for '{}'",
                    self.local_path.display()
                ),
                TfvcErrorCode::NotATfvcRepository,
                "workfold",
            ));
        };

        let server = Url::parse(&collection)
            .map_err(|e| {
                TfvcError::parse_error(
                    format!("Invalid collection URL '{}': {}", collection, e),
                    "workfold",
                )
            })?
            .to_string();

        let mut workspace = TfvcWorkspace::new(name, server);
        workspace.default_team_project = self.team_project(&mappings);
        workspace.mappings = mappings;

        debug!(
            workspace = %workspace.name,
            mappings = workspace.mappings.len(),
            "Found TFVC workspace"
        );
        Ok(workspace)
    }

    fn team_project(&self, mappings: &[WorkspaceMapping]) -> Option<String> {
        let mapping = if self.restrict_workspace {
            mappings.iter().find(|m| {
                m.local_path
                    .as_deref()
                    .map(|local| is_within(&self.local_path, Path::new(local)))
                    .unwrap_or(false)
            })
        } else {
            mappings.first()
        };
        mapping
            .and_then(WorkspaceMapping::team_project)
            .map(str::to_string)
    }
}

impl TfvcCommand for FindWorkspace {
    type Output = TfvcWorkspace;

    fn arguments(&self) -> ArgumentBuilder {
        let mut builder = ArgumentBuilder::new("workfold");
        // The JVM client refuses to run workfold without -login, even though
        // it only reads the local workspace cache.
        match self
            .server_context
            .as_ref()
            .and_then(|context| context.credentials.as_ref())
        {
            Some(credentials) => {
                builder.add_switch_with_value("login", Some(credentials.login_value().as_str()), true)
            }
            None => builder.add_switch_with_value("login", Some("fake,fake"), true),
        };
        builder.add(self.local_path.to_string_lossy());
        builder
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        let mut builder = ArgumentBuilder::new("workfold");
        builder.add(self.local_path.to_string_lossy());
        builder
    }

    fn options(&self) -> ExecutionConfig {
        ExecutionConfig::new().with_working_directory(&self.local_path)
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        process_errors("workfold", result, true)?;
        self.parse(&result.stdout)
    }

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        process_errors("workfold", result, true)?;
        let mut workspace = self.parse(&result.stdout)?;
        // tf.exe prints `Workspace : NAME (Owner Name)`
        if let Some(index) = workspace.name.find(" (") {
            if workspace.name.ends_with(')') {
                workspace.name.truncate(index);
            }
        }
        Ok(workspace)
    }
}

fn value_after_colon(line: &str) -> Option<String> {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_mapping(line: &str) -> Option<WorkspaceMapping> {
    if let Some(rest) = line.strip_prefix(CLOAKED_PREFIX) {
        let rest = rest.trim();
        let server_path = rest.split_once(':').map_or(rest, |(server, _)| server);
        return Some(WorkspaceMapping::cloaked(server_path.trim()));
    }
    if line.starts_with("$/") {
        let (server_path, local_path) = line.split_once(':')?;
        return Some(WorkspaceMapping::new(server_path.trim(), local_path.trim()));
    }
    None
}

fn is_within(path: &Path, folder: &Path) -> bool {
    let path = path.to_string_lossy().to_lowercase();
    let folder = folder.to_string_lossy().to_lowercase();
    let folder = folder.trim_end_matches(['/', '\\']);
    path == folder
        || path
            .strip_prefix(folder)
            .map(|rest| rest.starts_with('/') || rest.starts_with('\\'))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::server_context::Credentials;
    use pretty_assertions::assert_eq;

    const CLC_OUTPUT: &str = "WARN Some warning\n\
===============================================================================\n\
Workspace:  MyWorkspace\n\
Collection: https://tfs.local/DefaultCollection\n\
$/Fabrikam/Main: /home/me/main\n\
$/Contoso/Web: /home/me/web\n\
(cloaked) $/Fabrikam/Main/bin:\n";

    #[test]
    fn test_clc_arguments_carry_dummy_login() {
        let command = FindWorkspace::new("/home/me/main");
        let args = command.arguments();
        assert_eq!(
            args.build(),
            vec!["workfold", "-noprompt", "-login:fake,fake", "/home/me/main"]
        );
        assert!(!args.to_string().contains("fake,fake"));
        assert_eq!(
            command.exe_arguments().build(),
            vec!["workfold", "-noprompt", "/home/me/main"]
        );
        assert_eq!(
            command.options().working_directory,
            Some(PathBuf::from("/home/me/main"))
        );
    }

    #[test]
    fn test_real_credentials_replace_dummy_login() {
        let context = ServerContext::parse("https://tfs.local/DefaultCollection")
            .unwrap()
            .with_credentials(Credentials::new("bob", "pw"));
        let command = FindWorkspace::new("/ws").with_server_context(Some(context));
        assert!(command
            .arguments()
            .build()
            .contains(&"-login:bob,pw".to_string()));
    }

    #[test]
    fn test_parse_clc_output() {
        let workspace = FindWorkspace::new("/home/me/web")
            .parse_output(&ExecutionResult::new(0, CLC_OUTPUT, ""))
            .unwrap();

        assert_eq!(workspace.name, "MyWorkspace");
        assert_eq!(workspace.server, "https://tfs.local/DefaultCollection");
        assert_eq!(workspace.default_team_project.as_deref(), Some("Fabrikam"));
        assert_eq!(
            workspace.mappings,
            vec![
                WorkspaceMapping::new("$/Fabrikam/Main", "/home/me/main"),
                WorkspaceMapping::new("$/Contoso/Web", "/home/me/web"),
                WorkspaceMapping::cloaked("$/Fabrikam/Main/bin"),
            ]
        );
    }

    #[test]
    fn test_restrict_workspace_picks_containing_mapping() {
        let workspace = FindWorkspace::new("/home/me/web/src")
            .restrict_workspace(true)
            .parse_output(&ExecutionResult::new(0, CLC_OUTPUT, ""))
            .unwrap();
        assert_eq!(workspace.default_team_project.as_deref(), Some("Contoso"));
    }

    #[test]
    fn test_parse_exe_output() {
        let stdout = "===============================================================================\r\n\
Workspace : DESKTOP-01 (Jane Doe)\r\n\
Collection: https://account.visualstudio.com/\r\n \
$/Project: C:\\src\\project\r\n";
        let workspace = FindWorkspace::new("C:\\src\\project")
            .parse_exe_output(&ExecutionResult::new(0, stdout, ""))
            .unwrap();

        assert_eq!(workspace.name, "DESKTOP-01");
        assert_eq!(workspace.server, "https://account.visualstudio.com/");
        assert_eq!(
            workspace.mappings,
            vec![WorkspaceMapping::new("$/Project", "C:\\src\\project")]
        );
    }

    #[test]
    fn test_lines_before_separator_are_ignored() {
        let stdout = "Workspace: Bogus\nCollection: http://bogus/\n";
        let error = FindWorkspace::new("/ws")
            .parse_output(&ExecutionResult::new(0, stdout, ""))
            .unwrap_err();
        assert_eq!(error.code(), TfvcErrorCode::NotATfvcRepository);
    }

    #[test]
    fn test_banner_starting_with_equals_is_not_a_separator() {
        let stdout = "== NOTE ==\n$/Stale: /stale\n\
=====\nWorkspace: Real\nCollection: https://tfs.local/tfs\n$/Real: /ws\n";
        let workspace = FindWorkspace::new("/ws")
            .parse_output(&ExecutionResult::new(0, stdout, ""))
            .unwrap();
        assert_eq!(workspace.name, "Real");
        assert_eq!(
            workspace.mappings,
            vec![WorkspaceMapping::new("$/Real", "/ws")]
        );
    }

    #[test]
    fn test_workspace_without_mappings() {
        let stdout = "=====\nWorkspace: Empty\nCollection: https://tfs.local/tfs\n";
        let workspace = FindWorkspace::new("/ws")
            .parse_output(&ExecutionResult::new(0, stdout, ""))
            .unwrap();
        assert!(workspace.mappings.is_empty());
        assert_eq!(workspace.default_team_project, None);
    }

    #[test]
    fn test_unmapped_folder_is_classified() {
        let result = ExecutionResult::new(
            100,
            "",
            "An argument error occurred: The workspace could not be determined from any argument paths or the current working directory.",
        );
        let error = FindWorkspace::new("/tmp").parse_output(&result).unwrap_err();
        assert!(error.is_unavailable());
    }
}
