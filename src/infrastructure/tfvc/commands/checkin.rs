use crate::common::error::TfvcError;
use crate::common::result::TfvcResult;
use crate::domain::value_objects::server_context::ServerContext;
use crate::infrastructure::process::{ArgumentBuilder, ExecutionResult};
use crate::infrastructure::tfvc::command::TfvcCommand;
use crate::infrastructure::tfvc::command_helper::{parse_changeset_number, process_errors};
use std::path::PathBuf;

/// Exit code the tool uses when nothing was checked in
const CHECKIN_FAILED: i32 = 100;

/// `tf checkin -comment:<c> [-associate:<ids>] <paths>`; returns the new changeset number
#[derive(Debug, Clone)]
pub struct Checkin {
    server_context: Option<ServerContext>,
    paths: Vec<PathBuf>,
    comment: Option<String>,
    work_items: Vec<u32>,
}

impl Checkin {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            server_context: None,
            paths,
            comment: None,
            work_items: Vec::new(),
        }
    }

    pub fn with_server_context(mut self, context: Option<ServerContext>) -> Self {
        self.server_context = context;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_work_items(mut self, work_items: Vec<u32>) -> Self {
        self.work_items = work_items;
        self
    }
}

impl TfvcCommand for Checkin {
    type Output = u64;

    fn arguments(&self) -> ArgumentBuilder {
        let mut builder =
            ArgumentBuilder::new("checkin").with_server_context(self.server_context.as_ref());
        for path in &self.paths {
            builder.add(path.to_string_lossy());
        }
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            builder.add_switch_with_value("comment", Some(comment), false);
        }
        if !self.work_items.is_empty() {
            let ids = self
                .work_items
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");
            builder.add_switch_with_value("associate", Some(ids.as_str()), false);
        }
        builder
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        if result.exit_code == CHECKIN_FAILED {
            process_errors("checkin", result, true)?;
        }
        parse_changeset_number(&result.stdout).ok_or_else(|| {
            TfvcError::parse_error("No changeset number in the checkin output", "checkin")
        })
    }
}
