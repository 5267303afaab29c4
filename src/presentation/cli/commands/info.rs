use anyhow::Result;
use colored::Colorize;

use crate::application::services::WorkspaceSession;
use crate::presentation::cli::OutputFormat;

/// Handler for the workspace command
pub struct WorkspaceCommand {
    pub output: OutputFormat,
}

impl WorkspaceCommand {
    pub fn new(output: OutputFormat) -> Self {
        Self { output }
    }

    pub async fn execute(&self, session: &WorkspaceSession) -> Result<()> {
        let workspace = session.repository().find_workspace(session.root()).await?;

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&workspace)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&workspace)?),
            OutputFormat::Text => {
                println!("{}: {}", "Workspace".bold(), workspace.name);
                println!("{}: {}", "Collection".bold(), workspace.server);
                if let Some(project) = &workspace.default_team_project {
                    println!("{}: {}", "Team project".bold(), project);
                }
                if !workspace.mappings.is_empty() {
                    println!("{}:", "Mappings".bold());
                }
                for mapping in &workspace.mappings {
                    match &mapping.local_path {
                        Some(local) => println!("  {} -> {}", mapping.server_path.blue(), local),
                        None => println!("  {} {}", mapping.server_path.blue(), "(cloaked)".dimmed()),
                    }
                }
            }
        }
        Ok(())
    }
}

/// Handler for the version command
pub struct VersionCommand;

impl VersionCommand {
    pub async fn execute(&self, session: &WorkspaceSession) -> Result<()> {
        let tool = session.repository().tool();
        let version = session.repository().check_version().await?;

        println!("{}: {}", "Tool".bold(), tool.path.display());
        println!("{}: {}", "Variant".bold(), tool.variant);
        match version {
            Some(version) => println!("{}: {}", "Version".bold(), version),
            None => println!("{}: {}", "Version".bold(), "unknown".yellow()),
        }
        println!("{}: {}", "Minimum".bold(), tool.min_version);
        Ok(())
    }
}
