//! TF process plumbing: argument lists, the process runner and output helpers.

pub mod argument_builder;
pub mod output;
pub mod tf_runner;

pub use argument_builder::ArgumentBuilder;
pub use tf_runner::{ExecutionConfig, ExecutionResult, TfCommandRunner};
