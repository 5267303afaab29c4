use anyhow::Result;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;

use crate::application::services::WorkspaceSession;
use crate::application::use_cases::status_check::{
    GroupStatus, ResourceStatus, StatusCheckConfig, StatusCheckUseCase, StatusReport,
};
use crate::presentation::cli::OutputFormat;

/// Handler for the status command
pub struct StatusCommand {
    pub excludes: Vec<PathBuf>,
    pub output: OutputFormat,
    pub verbose: bool,
}

impl StatusCommand {
    pub fn new(excludes: Vec<PathBuf>, output: OutputFormat, verbose: bool) -> Self {
        Self {
            excludes,
            output,
            verbose,
        }
    }

    pub async fn execute(&self, session: &WorkspaceSession) -> Result<()> {
        let config = StatusCheckConfig::new()
            .with_excludes(self.excludes.clone())
            .with_workspace(self.verbose);
        let report = StatusCheckUseCase::new(config).execute(session).await?;

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
            OutputFormat::Text => self.print_text(&report),
        }
        Ok(())
    }

    fn print_text(&self, report: &StatusReport) {
        if self.verbose {
            if let Some(version) = &report.tool_version {
                println!("{} TF {}", "::".blue().bold(), version);
            }
            if let Some(workspace) = &report.workspace {
                println!(
                    "{} Workspace {} on {}",
                    "::".blue().bold(),
                    workspace.name.bold(),
                    workspace.server
                );
            }
        }

        if !report.has_changes() {
            println!("{} No pending changes", "✓".green().bold());
            return;
        }

        for group in &report.groups {
            print_group(group);
        }
    }
}

fn print_group(group: &GroupStatus) {
    println!("{} ({})", group.label.bold(), group.resources.len());
    for resource in &group.resources {
        let path = if resource.strike_through {
            resource.path.strikethrough()
        } else {
            resource.path.normal()
        };
        println!("  {} {}  {}", letter(resource), path, resource.change_type.dimmed());
    }
    println!();
}

fn letter(resource: &ResourceStatus) -> ColoredString {
    let letter = resource.letter.to_string();
    match resource.letter {
        'A' | 'B' | 'U' => letter.green(),
        'D' => letter.red(),
        'M' | 'R' => letter.yellow(),
        'G' => letter.magenta(),
        'L' => letter.cyan(),
        _ => letter.normal(),
    }
}
