use anyhow::{bail, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::application::services::WorkspaceSession;

/// Handler for the add command
pub struct AddCommand {
    pub paths: Vec<PathBuf>,
}

impl AddCommand {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub async fn execute(&self, session: &WorkspaceSession) -> Result<()> {
        let added = session.repository().add(self.paths.clone()).await?;
        if added.is_empty() {
            println!("{} Nothing to add", "⚠".yellow().bold());
        }
        for path in &added {
            println!("{} {}", "A".green(), path.display());
        }
        Ok(())
    }
}

/// Handler for the undo command
pub struct UndoCommand {
    pub paths: Vec<PathBuf>,
}

impl UndoCommand {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub async fn execute(&self, session: &WorkspaceSession) -> Result<()> {
        let undone = session.repository().undo(self.paths.clone()).await?;
        if undone.is_empty() {
            println!("{} No pending changes to undo", "⚠".yellow().bold());
        }
        for path in &undone {
            println!("{} {}", "undone".cyan(), path.display());
        }
        Ok(())
    }
}

/// Handler for the checkin command
pub struct CheckinCommand {
    pub paths: Vec<PathBuf>,
    pub comment: String,
    pub work_items: Vec<u32>,
}

impl CheckinCommand {
    pub fn new(paths: Vec<PathBuf>, comment: String, work_items: Vec<u32>) -> Self {
        Self {
            paths,
            comment,
            work_items,
        }
    }

    pub async fn execute(&self, session: &WorkspaceSession) -> Result<()> {
        let paths = if self.paths.is_empty() {
            // Everything in the Included group
            let model = session.model();
            model.refresh().await?;
            model
                .included_group()
                .resources
                .iter()
                .map(|resource| resource.local_path().to_path_buf())
                .collect()
        } else {
            self.paths.clone()
        };

        if paths.is_empty() {
            bail!("No included changes to check in");
        }

        println!("{} Checking in {} file(s)...", "::".blue().bold(), paths.len());
        let changeset = session
            .repository()
            .checkin(paths, &self.comment, self.work_items.clone())
            .await?;
        println!("{} Changeset {} checked in", "✓".green().bold(), changeset);
        Ok(())
    }
}
