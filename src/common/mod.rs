//! Shared error handling

pub mod error;
pub mod result;

pub use error::{TfvcError, TfvcErrorCode};
pub use result::{OptionExt, TfvcResult};
