/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - TF process execution (argument lists, the one-slot process runner)
/// - TFVC commands, error classification and the repository facade
/// - File system operations (settings files, workspace watcher)
pub mod filesystem;
pub mod process;
pub mod tfvc;

// Re-export commonly used types
pub use filesystem::{SettingsStore, WorkspaceWatcher};
pub use process::{ArgumentBuilder, ExecutionConfig, ExecutionResult, TfCommandRunner};
pub use tfvc::{PendingChangeSource, Repository, TfvcCommand, ToolLocator};
