use crate::common::result::TfvcResult;
use crate::domain::entities::pending_change::{normalize_path, PendingChange};
use crate::domain::entities::resource::{Resource, ResourceGroup, ResourceGroupKind};
use crate::domain::entities::settings::RefreshPolicy;
use crate::domain::value_objects::change_status::ChangeStatus;
use crate::infrastructure::tfvc::repository::PendingChangeSource;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Metadata folders the tool writes into the workspace
const TOOL_FOLDERS: [&str; 2] = ["$tf", ".tf"];

const EVENT_CAPACITY: usize = 16;

/// The three buckets of one refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedChanges {
    pub merge: ResourceGroup,
    pub included: ResourceGroup,
    pub excluded: ResourceGroup,
}

impl Default for ClassifiedChanges {
    fn default() -> Self {
        Self {
            merge: ResourceGroup::empty(ResourceGroupKind::Merge),
            included: ResourceGroup::empty(ResourceGroupKind::Included),
            excluded: ResourceGroup::empty(ResourceGroupKind::Excluded),
        }
    }
}

impl ClassifiedChanges {
    /// Groups shown to the user: Merge only when it has entries, Included
    /// and Excluded always.
    pub fn visible_groups(&self) -> Vec<ResourceGroup> {
        let mut groups = Vec::with_capacity(3);
        if !self.merge.is_empty() {
            groups.push(self.merge.clone());
        }
        groups.push(self.included.clone());
        groups.push(self.excluded.clone());
        groups
    }

    pub fn total(&self) -> usize {
        self.merge.len() + self.included.len() + self.excluded.len()
    }
}

/// Put every change in exactly one bucket.
///
/// Merges always go to Merge. Otherwise a path in `excluded` (normalized)
/// goes to Excluded; versioned items and tracked (non-candidate) changes go
/// to Included; remaining candidates go to Excluded.
pub fn classify(changes: &[PendingChange], excluded: &HashSet<String>) -> ClassifiedChanges {
    let mut groups = ClassifiedChanges::default();

    for change in changes {
        let resource = Resource::new(change.clone());
        let bucket = if resource.has_status(ChangeStatus::Merge) {
            &mut groups.merge
        } else if excluded.contains(&change.normalized_local_path()) {
            &mut groups.excluded
        } else if change.is_versioned() || !change.is_candidate {
            &mut groups.included
        } else {
            &mut groups.excluded
        };
        bucket.resources.push(resource);
    }
    groups
}

/// Whether a changed path lives inside the tool's own metadata folders
pub fn is_tool_metadata(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            TOOL_FOLDERS
                .iter()
                .any(|folder| name.eq_ignore_ascii_case(folder))
        }
        _ => false,
    })
}

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    pending: bool,
}

/// Keeps the Merge / Included / Excluded groups in step with `tf status`.
///
/// Every refresh fetches the full status and rebuilds all groups; the
/// exclusion set, keyed by lower-cased local path, is the only state that
/// survives between refreshes.
pub struct PendingChangeModel {
    source: Arc<dyn PendingChangeSource>,
    policy: RefreshPolicy,
    excluded: Mutex<HashSet<String>>,
    groups: RwLock<ClassifiedChanges>,
    refresh: Mutex<RefreshState>,
    events: broadcast::Sender<Vec<ResourceGroup>>,
}

impl PendingChangeModel {
    pub fn new(source: Arc<dyn PendingChangeSource>, policy: RefreshPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            source,
            policy,
            excluded: Mutex::new(HashSet::new()),
            groups: RwLock::new(ClassifiedChanges::default()),
            refresh: Mutex::new(RefreshState::default()),
            events,
        }
    }

    pub fn source(&self) -> &Arc<dyn PendingChangeSource> {
        &self.source
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Notified with the visible groups after every successful update
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<ResourceGroup>> {
        self.events.subscribe()
    }

    /// Guarded refresh trigger.
    ///
    /// Returns `Ok(false)` when a refresh was already running; depending on
    /// the policy the request is then either folded into one follow-up
    /// refresh or dropped.
    pub async fn status(&self) -> TfvcResult<bool> {
        if !self.begin_refresh() {
            return Ok(false);
        }

        loop {
            if let Err(e) = self.update().await {
                self.end_refresh();
                return Err(e);
            }
            if !self.continue_refresh() {
                return Ok(true);
            }
            debug!("Running coalesced refresh");
        }
    }

    /// Explicit full update, bypassing the re-entrancy guard
    pub async fn refresh(&self) -> TfvcResult<()> {
        self.update().await
    }

    async fn update(&self) -> TfvcResult<()> {
        let changes = self.source.get_status().await?;
        let excluded = lock(&self.excluded).clone();
        let classified = classify(&changes, &excluded);

        info!(
            merge = classified.merge.len(),
            included = classified.included.len(),
            excluded = classified.excluded.len(),
            "Pending changes updated"
        );

        let visible = classified.visible_groups();
        *self.groups.write().unwrap_or_else(PoisonError::into_inner) = classified;
        // No subscribers is fine
        let _ = self.events.send(visible);
        Ok(())
    }

    /// Move `path` to Excluded regardless of its change type (merges excepted)
    pub async fn exclude(&self, path: impl AsRef<Path>) -> TfvcResult<()> {
        let key = normalize_path(path);
        let changed = lock(&self.excluded).insert(key);
        if changed {
            self.update().await?;
        }
        Ok(())
    }

    /// Undo a previous [`exclude`](Self::exclude)
    pub async fn unexclude(&self, path: impl AsRef<Path>) -> TfvcResult<()> {
        let key = normalize_path(path);
        let changed = lock(&self.excluded).remove(&key);
        if changed {
            self.update().await?;
        }
        Ok(())
    }

    /// Seed the exclusion set without refreshing
    pub fn restore_exclusions<P: AsRef<Path>>(&self, paths: &[P]) {
        let mut excluded = lock(&self.excluded);
        excluded.extend(paths.iter().map(normalize_path));
    }

    pub fn is_excluded(&self, path: impl AsRef<Path>) -> bool {
        lock(&self.excluded).contains(&normalize_path(path))
    }

    pub fn excluded_paths(&self) -> Vec<String> {
        let mut paths = lock(&self.excluded).iter().cloned().collect::<Vec<_>>();
        paths.sort();
        paths
    }

    /// Snapshot of the current groups
    pub fn classified(&self) -> ClassifiedChanges {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn resource_groups(&self) -> Vec<ResourceGroup> {
        self.classified().visible_groups()
    }

    pub fn merge_group(&self) -> ResourceGroup {
        self.classified().merge
    }

    pub fn included_group(&self) -> ResourceGroup {
        self.classified().included
    }

    pub fn excluded_group(&self) -> ResourceGroup {
        self.classified().excluded
    }

    /// Trigger a guarded refresh unless every path is tool metadata.
    ///
    /// Returns whether a refresh ran.
    pub async fn on_file_change(&self, paths: &[PathBuf]) -> TfvcResult<bool> {
        if !paths.is_empty() && paths.iter().all(|p| is_tool_metadata(p)) {
            return Ok(false);
        }
        self.status().await
    }

    fn begin_refresh(&self) -> bool {
        let mut state = lock(&self.refresh);
        if state.in_flight {
            if self.policy == RefreshPolicy::Coalesce {
                state.pending = true;
            }
            debug!(policy = ?self.policy, "Refresh already running");
            return false;
        }
        state.in_flight = true;
        true
    }

    /// Either claim the pending follow-up refresh or finish
    fn continue_refresh(&self) -> bool {
        let mut state = lock(&self.refresh);
        if state.pending {
            state.pending = false;
            return true;
        }
        state.in_flight = false;
        false
    }

    fn end_refresh(&self) {
        let mut state = lock(&self.refresh);
        state.in_flight = false;
        state.pending = false;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
