pub mod settings_store;
pub mod watcher;

pub use settings_store::SettingsStore;
pub use watcher::WorkspaceWatcher;
