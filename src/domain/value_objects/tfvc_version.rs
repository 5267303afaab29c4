use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Dotted TF tool version: numeric major.minor.revision plus an opaque build
/// qualifier (everything after the third dot).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TfvcVersion {
    pub major: u64,
    pub minor: u64,
    pub revision: u64,
    pub build: String,
}

impl TfvcVersion {
    pub fn new(major: u64, minor: u64, revision: u64, build: impl Into<String>) -> Self {
        Self {
            major,
            minor,
            revision,
            build: build.into(),
        }
    }

    /// Parse a version string. Missing or non-numeric components become `0`.
    pub fn from_string(version: &str) -> Self {
        let version = version.trim();
        let mut parts = if version.is_empty() {
            Vec::new()
        } else {
            version.splitn(4, '.').collect::<Vec<_>>()
        };
        parts.resize(4, "");

        let number = |s: &str| s.trim().parse::<u64>().unwrap_or(0);
        Self {
            major: number(parts[0]),
            minor: number(parts[1]),
            revision: number(parts[2]),
            build: parts[3].to_string(),
        }
    }

    /// Compare two versions; negative when `left` is older than `right`.
    pub fn compare(left: &TfvcVersion, right: &TfvcVersion) -> i32 {
        match left.cmp(right) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }
}

impl Ord for TfvcVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.revision.cmp(&other.revision))
            .then_with(|| self.build.cmp(&other.build))
    }
}

impl PartialOrd for TfvcVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TfvcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)?;
        if !self.build.is_empty() {
            write!(f, ".{}", self.build)?;
        }
        Ok(())
    }
}
