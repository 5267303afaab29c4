//! TF command protocol objects, one per subcommand.

pub mod add;
pub mod checkin;
pub mod find_workspace;
pub mod get_file_content;
pub mod get_version;
pub mod status;
pub mod undo;

pub use add::Add;
pub use checkin::Checkin;
pub use find_workspace::FindWorkspace;
pub use get_file_content::GetFileContent;
pub use get_version::GetVersion;
pub use status::Status;
pub use undo::Undo;
