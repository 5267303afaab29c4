//! ユースケース

pub mod status_check;
pub mod watch_workspace;
