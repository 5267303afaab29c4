//! In-memory pending-change source

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tfvc_scm::common::result::TfvcResult;
use tfvc_scm::domain::entities::pending_change::PendingChange;
use tfvc_scm::infrastructure::tfvc::PendingChangeSource;

/// Returns whatever changes were last set
#[derive(Default)]
pub struct FakeSource {
    changes: Mutex<Vec<PendingChange>>,
    status_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_changes(changes: Vec<PendingChange>) -> Self {
        Self {
            changes: Mutex::new(changes),
            status_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_changes(&self, changes: Vec<PendingChange>) {
        *self.changes.lock().unwrap() = changes;
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PendingChangeSource for FakeSource {
    async fn get_status(&self) -> TfvcResult<Vec<PendingChange>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.changes.lock().unwrap().clone())
    }

    async fn get_file_content(&self, item: &str, version: Option<&str>) -> TfvcResult<String> {
        Ok(format!("{}@{}", item, version.unwrap_or("T")))
    }
}
