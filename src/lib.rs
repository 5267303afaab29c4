//! # tfvc-scm - TFVC pending changes through the TF command line client
//!
//! `tfvc-scm` drives the TF command line client (`tf.exe` or the Team Explorer
//! Everywhere client) and keeps an in-memory model of a workspace's pending
//! changes, grouped the way a source control view shows them.
//!
//! ## Features
//!
//! - **Process Runner**: One-slot pre-warmed process cache with serialized execution
//! - **Command Objects**: `status`, `workfold`, `add`, `undo`, `checkin`, `print`/`view`
//! - **Error Classification**: Tool output mapped to categorized error codes
//! - **Pending-Change Model**: Merge / Included / Excluded groups with user exclusions
//! - **Watching**: Refresh on file-system events and optional polling
//!
//! ## Quick Start
//!
//! 1. Point the crate at the TF client (`.tfvc.yml` at the repository root):
//!
//! ```yaml
//! location: /opt/tee/tf
//! count_mode: included
//! ```
//!
//! 2. Show the pending changes:
//!
//! ```bash
//! tfvc-scm status
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: Pending changes, workspaces, resources and settings
//! - [`application`]: Pending-change model, SCM provider and use cases
//! - [`infrastructure`]: TF process execution, command objects, settings and watching
//! - [`presentation`]: CLI interface
//! - [`common`]: Error handling
//!
//! ## Examples
//!
//! ```rust,no_run
//! use tfvc_scm::application::services::{SessionOptions, WorkspaceSession};
//!
//! # async fn example() -> tfvc_scm::Result<()> {
//! let session = WorkspaceSession::open(SessionOptions::new("/work/project")).await?;
//! session.model().refresh().await?;
//!
//! for resource in &session.model().included_group().resources {
//!     println!("{} {}", resource.status().letter(), resource.local_path().display());
//! }
//! session.dispose().await;
//! # Ok(())
//! # }
//! ```

// Documentation attributes
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::{TfvcError, TfvcErrorCode};
pub use crate::common::result::TfvcResult as Result;
