use anyhow::Result;
use std::io::Write;

use crate::application::services::WorkspaceSession;

/// Handler for the show command
pub struct ShowCommand {
    pub path: String,
    pub version: Option<String>,
}

impl ShowCommand {
    pub fn new(path: String, version: Option<String>) -> Self {
        Self { path, version }
    }

    pub async fn execute(&self, session: &WorkspaceSession) -> Result<()> {
        let content = session
            .repository()
            .get_file_content(&self.path, self.version.as_deref())
            .await?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}
