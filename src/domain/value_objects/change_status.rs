use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of a pending change's change-type list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    /// New file scheduled for add
    Add,
    /// Branched from another server path
    Branch,
    /// Scheduled for delete
    Delete,
    /// Content edit
    Edit,
    /// Locked for check-in or check-out
    Lock,
    /// Result of a merge
    Merge,
    /// Renamed or moved
    Rename,
    /// Restored after a delete
    Undelete,
    /// Anything the tool reports that we don't model
    Unknown,
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStatus::Add => write!(f, "add"),
            ChangeStatus::Branch => write!(f, "branch"),
            ChangeStatus::Delete => write!(f, "delete"),
            ChangeStatus::Edit => write!(f, "edit"),
            ChangeStatus::Lock => write!(f, "lock"),
            ChangeStatus::Merge => write!(f, "merge"),
            ChangeStatus::Rename => write!(f, "rename"),
            ChangeStatus::Undelete => write!(f, "undelete"),
            ChangeStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for ChangeStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "add" => ChangeStatus::Add,
            "branch" => ChangeStatus::Branch,
            "delete" => ChangeStatus::Delete,
            "edit" => ChangeStatus::Edit,
            "lock" => ChangeStatus::Lock,
            "merge" => ChangeStatus::Merge,
            "rename" | "source rename" => ChangeStatus::Rename,
            "undelete" => ChangeStatus::Undelete,
            _ => ChangeStatus::Unknown,
        })
    }
}

impl ChangeStatus {
    /// Parse a comma separated change-type attribute (`"edit, rename"`).
    ///
    /// Order is preserved; empty input yields an empty list.
    pub fn parse_list(change_type: &str) -> Vec<ChangeStatus> {
        change_type
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().unwrap_or(ChangeStatus::Unknown))
            .collect()
    }

    /// Icon name used for source control decorations
    pub fn icon_name(&self) -> Option<&'static str> {
        match self {
            ChangeStatus::Add => Some("status-add"),
            ChangeStatus::Branch => Some("status-branch"),
            ChangeStatus::Delete => Some("status-delete"),
            ChangeStatus::Edit => Some("status-edit"),
            ChangeStatus::Lock => Some("status-lock"),
            ChangeStatus::Merge => Some("status-merge"),
            ChangeStatus::Rename => Some("status-rename"),
            ChangeStatus::Undelete => Some("status-undelete"),
            ChangeStatus::Unknown => None,
        }
    }

    /// Single letter used in compact listings
    pub fn letter(&self) -> char {
        match self {
            ChangeStatus::Add => 'A',
            ChangeStatus::Branch => 'B',
            ChangeStatus::Delete => 'D',
            ChangeStatus::Edit => 'M',
            ChangeStatus::Lock => 'L',
            ChangeStatus::Merge => 'G',
            ChangeStatus::Rename => 'R',
            ChangeStatus::Undelete => 'U',
            ChangeStatus::Unknown => '?',
        }
    }
}
