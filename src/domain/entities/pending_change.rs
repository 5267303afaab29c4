use crate::domain::value_objects::change_status::ChangeStatus;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row of `tf status` output.
///
/// Snapshots are immutable and replaced wholesale on every refresh; the
/// normalized local path is the only identity that survives between refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    /// Raw change-type text, e.g. `"edit, rename"`
    pub change_type: String,
    pub owner: String,
    /// Timestamp as reported by the tool
    pub date: String,
    pub workspace: String,
    pub computer: String,
    pub server_item: String,
    pub local_item: String,
    /// Rename source, when the tool reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_item: Option<String>,
    pub lock: String,
    /// Workspace version; `"0"` means the item was never checked in
    pub version: String,
    /// Detected by the tool but not yet tracked as a pending change
    pub is_candidate: bool,
}

impl PendingChange {
    /// Minimal change for a local path; the remaining fields are empty.
    pub fn new(change_type: impl Into<String>, local_item: impl Into<String>) -> Self {
        Self {
            change_type: change_type.into(),
            owner: String::new(),
            date: String::new(),
            workspace: String::new(),
            computer: String::new(),
            server_item: String::new(),
            local_item: local_item.into(),
            source_item: None,
            lock: "none".to_string(),
            version: "0".to_string(),
            is_candidate: false,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_server_item(mut self, server_item: impl Into<String>) -> Self {
        self.server_item = server_item.into();
        self
    }

    pub fn with_source_item(mut self, source_item: impl Into<String>) -> Self {
        self.source_item = Some(source_item.into());
        self
    }

    pub fn as_candidate(mut self) -> Self {
        self.is_candidate = true;
        self
    }

    /// Parsed change types, in the order the tool listed them
    pub fn statuses(&self) -> Vec<ChangeStatus> {
        ChangeStatus::parse_list(&self.change_type)
    }

    pub fn has_status(&self, status: ChangeStatus) -> bool {
        self.statuses().contains(&status)
    }

    /// The item exists on the server (it has a non-zero workspace version)
    pub fn is_versioned(&self) -> bool {
        let version = self.version.trim();
        !version.is_empty() && version != "0"
    }

    pub fn local_path(&self) -> &Path {
        Path::new(&self.local_item)
    }

    /// Lower-cased local path, the key used by the exclusion set
    pub fn normalized_local_path(&self) -> String {
        normalize_path(&self.local_item)
    }

    /// `date` parsed as a timestamp, if it is in a recognised format
    pub fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date)
            .or_else(|_| DateTime::parse_from_str(&self.date, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .ok()
    }
}

/// Normalize a local path for case-insensitive comparisons
pub fn normalize_path(path: impl AsRef<Path>) -> String {
    path.as_ref().to_string_lossy().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned() {
        let change = PendingChange::new("add", "/ws/new.txt");
        assert!(!change.is_versioned());
        assert!(change.with_version("12").is_versioned());
    }

    #[test]
    fn test_statuses_and_normalized_path() {
        let change = PendingChange::new("edit, rename", "/WS/Readme.MD");
        assert_eq!(
            change.statuses(),
            vec![ChangeStatus::Edit, ChangeStatus::Rename]
        );
        assert!(change.has_status(ChangeStatus::Rename));
        assert!(!change.has_status(ChangeStatus::Merge));
        assert_eq!(change.normalized_local_path(), "/ws/readme.md");
    }

    #[test]
    fn test_parsed_date() {
        let mut change = PendingChange::new("edit", "/ws/a.txt");
        change.date = "2017-02-24T13:50:03.103-05:00".to_string();
        let date = change.parsed_date().unwrap();
        assert_eq!(date.offset().local_minus_utc(), -5 * 3600);

        change.date = "yesterday".to_string();
        assert!(change.parsed_date().is_none());
    }
}
