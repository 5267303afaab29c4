use super::pending_change_model::PendingChangeModel;
use crate::common::result::TfvcResult;
use crate::domain::entities::resource::{OpenAction, Resource, ResourceGroup};
use crate::domain::entities::settings::CountMode;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// What opening a resource produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpenedResource {
    /// The local file is gone; only the server copy can be shown
    ServerContent {
        server_path: String,
        version_spec: String,
        content: String,
    },
    /// Server copy (left) against the local file (right)
    Diff {
        server_path: String,
        version_spec: String,
        original: String,
        local_path: PathBuf,
    },
    Local { local_path: PathBuf },
}

/// Contract between a version control backend and a source control UI
#[async_trait]
pub trait SourceControlProvider: Send + Sync {
    fn id(&self) -> &'static str;

    fn label(&self) -> &'static str;

    /// Badge count
    fn count(&self) -> usize;

    fn resource_groups(&self) -> Vec<ResourceGroup>;

    /// Fires whenever the groups change
    fn subscribe(&self) -> broadcast::Receiver<Vec<ResourceGroup>>;

    async fn open(&self, resource: &Resource) -> TfvcResult<OpenedResource>;
}

/// TFVC source control provider backed by a [`PendingChangeModel`]
pub struct TfvcScmProvider {
    model: Arc<PendingChangeModel>,
    count_mode: CountMode,
}

impl TfvcScmProvider {
    pub fn new(model: Arc<PendingChangeModel>, count_mode: CountMode) -> Self {
        Self { model, count_mode }
    }

    pub fn model(&self) -> &Arc<PendingChangeModel> {
        &self.model
    }

    async fn server_content(&self, server_path: &str, version: &str) -> TfvcResult<(String, String)> {
        let version_spec = format!("C{}", version);
        let content = self
            .model
            .source()
            .get_file_content(server_path, Some(version_spec.as_str()))
            .await?;
        Ok((version_spec, content))
    }
}

#[async_trait]
impl SourceControlProvider for TfvcScmProvider {
    fn id(&self) -> &'static str {
        "tfvc"
    }

    fn label(&self) -> &'static str {
        "TFVC"
    }

    fn count(&self) -> usize {
        let groups = self.model.classified();
        match self.count_mode {
            CountMode::Off => 0,
            CountMode::Included => groups.included.len(),
            CountMode::All => groups.total(),
        }
    }

    fn resource_groups(&self) -> Vec<ResourceGroup> {
        self.model.resource_groups()
    }

    fn subscribe(&self) -> broadcast::Receiver<Vec<ResourceGroup>> {
        self.model.subscribe()
    }

    async fn open(&self, resource: &Resource) -> TfvcResult<OpenedResource> {
        let action = resource.open_action();
        debug!(?action, "Opening {}", resource.local_path().display());

        match action {
            OpenAction::ShowServer {
                server_path,
                version,
            } => {
                let (version_spec, content) = self.server_content(&server_path, &version).await?;
                Ok(OpenedResource::ServerContent {
                    server_path,
                    version_spec,
                    content,
                })
            }
            OpenAction::Diff {
                server_path,
                version,
                local_path,
            } => {
                let (version_spec, original) = self.server_content(&server_path, &version).await?;
                Ok(OpenedResource::Diff {
                    server_path,
                    version_spec,
                    original,
                    local_path,
                })
            }
            OpenAction::OpenLocal { local_path } => Ok(OpenedResource::Local { local_path }),
        }
    }
}
