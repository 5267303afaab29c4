pub mod pending_change;
pub mod resource;
pub mod settings;
pub mod workspace;

pub use pending_change::PendingChange;
pub use resource::{Decorations, OpenAction, Resource, ResourceGroup, ResourceGroupKind};
pub use settings::{CountMode, RefreshPolicy, TfvcSettings};
pub use workspace::{TfvcWorkspace, WorkspaceMapping};
