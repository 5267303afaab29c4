use crate::common::result::TfvcResult;
use crate::domain::value_objects::server_context::ServerContext;
use crate::infrastructure::process::output::split_into_lines;
use crate::infrastructure::process::{ArgumentBuilder, ExecutionResult};
use crate::infrastructure::tfvc::command::TfvcCommand;
use crate::infrastructure::tfvc::command_helper::{parse_folder_listing, process_errors};
use std::path::PathBuf;

/// `tf add <paths>`; returns the files the tool reports as added
#[derive(Debug, Clone)]
pub struct Add {
    server_context: Option<ServerContext>,
    paths: Vec<PathBuf>,
}

impl Add {
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

impl TfvcCommand for Add {
    type Output = Vec<PathBuf>;

    fn arguments(&self) -> ArgumentBuilder {
        let mut builder =
            ArgumentBuilder::new("add").with_server_context(self.server_context.as_ref());
        for path in &self.paths {
            builder.add(path.to_string_lossy());
        }
        builder
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        process_errors("add", result, true)?;

        let lines = split_into_lines(&result.stdout, true, true)
            .into_iter()
            // JVM client / tf.exe wording when a path matched nothing
            .filter(|line| !line.starts_with("No arguments matched any files to add."))
            .filter(|line| !line.ends_with(" No file matches."))
            .collect::<Vec<_>>();

        Ok(parse_folder_listing(&lines, |line| Some(line.trim())))
    }
}
