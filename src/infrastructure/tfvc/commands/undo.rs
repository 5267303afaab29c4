use crate::common::result::TfvcResult;
use crate::domain::value_objects::server_context::ServerContext;
use crate::infrastructure::process::output::split_into_lines;
use crate::infrastructure::process::{ArgumentBuilder, ExecutionResult};
use crate::infrastructure::tfvc::command::TfvcCommand;
use crate::infrastructure::tfvc::command_helper::{parse_folder_listing, process_errors};
use std::path::PathBuf;

/// Exit code meaning "some of the paths had nothing to undo"
const PARTIAL_SUCCESS: i32 = 1;

/// `tf undo <paths>`; returns the files whose changes were undone
#[derive(Debug, Clone)]
pub struct Undo {
    server_context: Option<ServerContext>,
    paths: Vec<PathBuf>,
}

impl Undo {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            server_context: None,
            paths,
        }
    }

    pub fn with_server_context(mut self, context: Option<ServerContext>) -> Self {
        self.server_context = context;
        self
    }
}

impl TfvcCommand for Undo {
    type Output = Vec<PathBuf>;

    fn arguments(&self) -> ArgumentBuilder {
        let mut builder =
            ArgumentBuilder::new("undo").with_server_context(self.server_context.as_ref());
        for path in &self.paths {
            builder.add(path.to_string_lossy());
        }
        builder
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        let mut lines = split_into_lines(&result.stdout, true, true);

        if result.exit_code == PARTIAL_SUCCESS {
            lines.retain(|line| !line.starts_with("No pending changes "));
        } else {
            process_errors("undo", result, true)?;
        }

        // `Undoing edit: a.txt`
        Ok(parse_folder_listing(&lines, |line| {
            line.split_once(": ").map(|(_, file)| file.trim())
        }))
    }
}
