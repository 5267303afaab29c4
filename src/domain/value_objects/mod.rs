pub mod change_status;
pub mod server_context;
pub mod tf_tool;
pub mod tfvc_version;

pub use change_status::ChangeStatus;
pub use server_context::{Credentials, ServerContext};
pub use tf_tool::{TfTool, ToolVariant};
pub use tfvc_version::TfvcVersion;
