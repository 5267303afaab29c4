use crate::common::error::TfvcError;
use crate::common::result::TfvcResult;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Buffered file events; overflow is dropped since every event only
/// triggers a full refresh anyway.
const EVENT_BUFFER: usize = 1000;

/// Recursive file-system watcher on a workspace root.
///
/// Changed paths are delivered on the receiver returned by [`start`];
/// dropping the watcher stops delivery.
///
/// [`start`]: WorkspaceWatcher::start
pub struct WorkspaceWatcher {
    root: PathBuf,
    _watcher: RecommendedWatcher,
}

impl WorkspaceWatcher {
    pub fn start(root: &Path) -> TfvcResult<(Self, mpsc::Receiver<Vec<PathBuf>>)> {
        let (event_tx, event_rx) = mpsc::channel::<Vec<PathBuf>>(EVENT_BUFFER);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) if is_content_change(&event.kind) && !event.paths.is_empty() => {
                    if event_tx.try_send(event.paths).is_err() {
                        debug!("File event dropped, channel full or closed");
                    }
                }
                Ok(_) => {}
                Err(e) => error!("Filesystem watch error: {}", e),
            }
        })
        .map_err(|e| TfvcError::watch_error("Failed to create the file watcher", e))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| {
                TfvcError::watch_error(format!("Failed to watch {}", root.display()), e)
            })?;
        info!("Watching directory: {}", root.display());

        Ok((
            Self {
                root: root.to_path_buf(),
                _watcher: watcher,
            },
            event_rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Access events do not change pending changes
fn is_content_change(kind: &EventKind) -> bool {
    !matches!(kind, EventKind::Access(_))
}
