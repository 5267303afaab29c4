use crate::common::error::TfvcError;
use crate::common::result::TfvcResult;
use crate::domain::entities::pending_change::PendingChange;
use crate::domain::value_objects::server_context::ServerContext;
use crate::infrastructure::process::output::trim_to_xml;
use crate::infrastructure::process::{ArgumentBuilder, ExecutionResult};
use crate::infrastructure::tfvc::command::TfvcCommand;
use crate::infrastructure::tfvc::command_helper::process_errors;
use std::path::{Path, PathBuf};
use tracing::debug;

const PENDING_CHANGES: &str = "pending-changes";
const CANDIDATE_PENDING_CHANGES: &str = "candidate-pending-changes";
const PENDING_CHANGE: &str = "pending-change";

/// `tf status -format:xml -recursive`
///
/// Reads both `<pending-changes>` and `<candidate-pending-changes>`; entries
/// from the second list are flagged as candidates.
#[derive(Debug, Clone, Default)]
pub struct Status {
    server_context: Option<ServerContext>,
    local_paths: Vec<PathBuf>,
    ignore_folders: bool,
}

impl Status {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server_context(mut self, context: Option<ServerContext>) -> Self {
        self.server_context = context;
        self
    }

    /// Limit the status to these paths (default: the working directory)
    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.local_paths = paths;
        self
    }

    /// Drop entries whose local path is an existing directory
    pub fn ignore_folders(mut self, ignore: bool) -> Self {
        self.ignore_folders = ignore;
        self
    }
}

impl TfvcCommand for Status {
    type Output = Vec<PendingChange>;

    fn arguments(&self) -> ArgumentBuilder {
        let mut builder =
            ArgumentBuilder::new("status").with_server_context(self.server_context.as_ref());
        builder
            .add_switch_with_value("format", Some("xml"), false)
            .add_switch("recursive");
        for path in &self.local_paths {
            builder.add(path.to_string_lossy());
        }
        builder
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        process_errors("status", result, false)?;

        let xml = trim_to_xml(&result.stdout);
        if !xml.starts_with("<?xml") {
            debug!("tf status returned no XML document");
            return Ok(Vec::new());
        }

        let changes = parse_status_xml(xml)?;
        if !self.ignore_folders {
            return Ok(changes);
        }
        Ok(changes
            .into_iter()
            .filter(|change| !Path::new(&change.local_item).is_dir())
            .collect())
    }
}

/// Parse a `<status>` document into pending changes, in document order
pub fn parse_status_xml(xml: &str) -> TfvcResult<Vec<PendingChange>> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| TfvcError::xml_error("status", e))?;

    let mut changes = Vec::new();
    for list in doc
        .descendants()
        .filter(|n| n.has_tag_name(PENDING_CHANGES) || n.has_tag_name(CANDIDATE_PENDING_CHANGES))
    {
        let is_candidate = list.has_tag_name(CANDIDATE_PENDING_CHANGES);
        for node in list.children().filter(|n| n.has_tag_name(PENDING_CHANGE)) {
            let attr = |name: &str| node.attribute(name).unwrap_or_default().to_string();
            changes.push(PendingChange {
                change_type: attr("change-type"),
                owner: attr("owner"),
                date: attr("date"),
                workspace: attr("workspace"),
                computer: attr("computer"),
                server_item: attr("server-item"),
                local_item: attr("local-item"),
                source_item: node
                    .attribute("source-item")
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                lock: attr("lock"),
                version: attr("version"),
                is_candidate,
            });
        }
    }

    debug!(count = changes.len(), "Parsed tf status output");
    Ok(changes)
}
