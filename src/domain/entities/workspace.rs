use serde::{Deserialize, Serialize};
use std::path::Path;

/// One working folder mapping of a TFVC workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMapping {
    /// Server path, e.g. `$/Project/Main`
    pub server_path: String,
    /// Local folder; cloaked mappings have none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    pub cloaked: bool,
}

impl WorkspaceMapping {
    pub fn new(server_path: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self {
            server_path: server_path.into(),
            local_path: Some(local_path.into()),
            cloaked: false,
        }
    }

    pub fn cloaked(server_path: impl Into<String>) -> Self {
        Self {
            server_path: server_path.into(),
            local_path: None,
            cloaked: true,
        }
    }

    /// Team project named by the server path (`$/Project/...` → `Project`)
    pub fn team_project(&self) -> Option<&str> {
        self.server_path
            .strip_prefix("$/")
            .and_then(|rest| rest.split('/').next())
            .filter(|project| !project.is_empty())
    }
}

/// The tool's workspace: a named server-to-local mapping context.
///
/// Not to be confused with the folder opened in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfvcWorkspace {
    pub name: String,
    /// Team project collection URL
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_team_project: Option<String>,
    pub mappings: Vec<WorkspaceMapping>,
}

impl TfvcWorkspace {
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            default_team_project: None,
            mappings: Vec::new(),
        }
    }

    /// Whether `local_path` sits under one of the (non-cloaked) mappings
    pub fn maps_local_path(&self, local_path: &Path) -> bool {
        let target = local_path.to_string_lossy().to_lowercase();
        self.mappings
            .iter()
            .filter(|m| !m.cloaked)
            .filter_map(|m| m.local_path.as_deref())
            .any(|mapped| {
                let mapped = mapped.trim_end_matches(['/', '\\']).to_lowercase();
                target == mapped
                    || target
                        .strip_prefix(&mapped)
                        .map(|rest| rest.starts_with('/') || rest.starts_with('\\'))
                        .unwrap_or(false)
            })
    }
}
