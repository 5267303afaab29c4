//! TFVC command layer: command objects, error classification, tool
//! discovery and the workspace-bound repository.

pub mod command;
pub mod command_helper;
pub mod commands;
pub mod repository;
pub mod tool_locator;

pub use command::TfvcCommand;
pub use repository::{PendingChangeSource, Repository};
pub use tool_locator::ToolLocator;
