use super::pending_change::PendingChange;
use crate::domain::value_objects::change_status::ChangeStatus;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Decoration metadata shown next to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decorations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    pub strike_through: bool,
    pub tooltip: String,
}

/// What opening a resource should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OpenAction {
    /// Only the server copy exists (deleted locally)
    ShowServer {
        server_path: String,
        version: String,
    },
    /// Server copy on the left, local file on the right
    Diff {
        server_path: String,
        version: String,
        local_path: PathBuf,
    },
    /// Just open the local file
    OpenLocal { local_path: PathBuf },
}

/// UI projection of one pending change; rebuilt on every refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub change: PendingChange,
    pub statuses: Vec<ChangeStatus>,
}

impl Resource {
    pub fn new(change: PendingChange) -> Self {
        let statuses = change.statuses();
        Self { change, statuses }
    }

    /// Primary status: the first one the tool listed
    pub fn status(&self) -> ChangeStatus {
        self.statuses
            .first()
            .copied()
            .unwrap_or(ChangeStatus::Unknown)
    }

    pub fn has_status(&self, status: ChangeStatus) -> bool {
        self.statuses.contains(&status)
    }

    pub fn local_path(&self) -> &Path {
        self.change.local_path()
    }

    pub fn normalized_path(&self) -> String {
        self.change.normalized_local_path()
    }

    pub fn decorations(&self) -> Decorations {
        let mut tooltip = self.change.change_type.clone();
        if self.change.is_candidate {
            tooltip.push_str(" (candidate)");
        }
        Decorations {
            icon: self.status().icon_name(),
            strike_through: self.has_status(ChangeStatus::Delete),
            tooltip,
        }
    }

    pub fn open_action(&self) -> OpenAction {
        let version = self.change.version.clone();
        if self.has_status(ChangeStatus::Delete) {
            return OpenAction::ShowServer {
                server_path: self.change.server_item.clone(),
                version,
            };
        }
        if self.has_status(ChangeStatus::Rename) {
            let server_path = self
                .change
                .source_item
                .clone()
                .unwrap_or_else(|| self.change.server_item.clone());
            return OpenAction::Diff {
                server_path,
                version,
                local_path: self.local_path().to_path_buf(),
            };
        }
        if self.has_status(ChangeStatus::Edit) {
            return OpenAction::Diff {
                server_path: self.change.server_item.clone(),
                version,
                local_path: self.local_path().to_path_buf(),
            };
        }
        OpenAction::OpenLocal {
            local_path: self.local_path().to_path_buf(),
        }
    }
}

/// Buckets presented to the source control UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceGroupKind {
    Merge,
    Included,
    Excluded,
}

impl ResourceGroupKind {
    pub fn id(&self) -> &'static str {
        match self {
            ResourceGroupKind::Merge => "merge",
            ResourceGroupKind::Included => "included",
            ResourceGroupKind::Excluded => "excluded",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceGroupKind::Merge => "Merge Changes",
            ResourceGroupKind::Included => "Included Changes",
            ResourceGroupKind::Excluded => "Excluded Changes",
        }
    }
}

impl fmt::Display for ResourceGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceGroup {
    pub kind: ResourceGroupKind,
    pub resources: Vec<Resource>,
}

impl ResourceGroup {
    pub fn new(kind: ResourceGroupKind, resources: Vec<Resource>) -> Self {
        Self { kind, resources }
    }

    pub fn empty(kind: ResourceGroupKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Local paths in this group, in order
    pub fn local_paths(&self) -> Vec<&str> {
        self.resources
            .iter()
            .map(|r| r.change.local_item.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_is_struck_through_and_shows_server() {
        let resource = Resource::new(
            PendingChange::new("delete", "/ws/gone.txt")
                .with_server_item("$/P/gone.txt")
                .with_version("5"),
        );
        let decorations = resource.decorations();
        assert!(decorations.strike_through);
        assert_eq!(decorations.icon, Some("status-delete"));
        assert_eq!(
            resource.open_action(),
            OpenAction::ShowServer {
                server_path: "$/P/gone.txt".to_string(),
                version: "5".to_string(),
            }
        );
    }

    #[test]
    fn test_rename_diffs_against_source_item() {
        let resource = Resource::new(
            PendingChange::new("rename, edit", "/ws/new.txt")
                .with_server_item("$/P/new.txt")
                .with_source_item("$/P/old.txt")
                .with_version("3"),
        );
        assert_eq!(resource.status(), ChangeStatus::Rename);
        assert_eq!(
            resource.open_action(),
            OpenAction::Diff {
                server_path: "$/P/old.txt".to_string(),
                version: "3".to_string(),
                local_path: PathBuf::from("/ws/new.txt"),
            }
        );
    }

    #[test]
    fn test_add_opens_local_file() {
        let resource = Resource::new(PendingChange::new("add", "/ws/a.txt").as_candidate());
        assert_eq!(
            resource.open_action(),
            OpenAction::OpenLocal {
                local_path: PathBuf::from("/ws/a.txt")
            }
        );
        assert_eq!(resource.decorations().tooltip, "add (candidate)");
        assert!(!resource.decorations().strike_through);
    }

    #[test]
    fn test_group_labels() {
        assert_eq!(ResourceGroupKind::Merge.id(), "merge");
        assert_eq!(ResourceGroupKind::Excluded.to_string(), "Excluded Changes");
        assert!(ResourceGroup::empty(ResourceGroupKind::Included).is_empty());
    }
}
