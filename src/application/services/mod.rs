//! アプリケーションサービス

pub mod pending_change_model;
pub mod scm_provider;
pub mod workspace_session;

pub use pending_change_model::{classify, ClassifiedChanges, PendingChangeModel};
pub use scm_provider::{OpenedResource, SourceControlProvider, TfvcScmProvider};
pub use workspace_session::{SessionOptions, WorkspaceSession};
