use crate::common::result::TfvcResult;
use crate::domain::value_objects::tfvc_version::TfvcVersion;
use crate::infrastructure::process::output::split_into_lines;
use crate::infrastructure::process::{ArgumentBuilder, ExecutionResult};
use crate::infrastructure::tfvc::command::TfvcCommand;
use crate::infrastructure::tfvc::command_helper::process_errors;
use regex::Regex;
use std::sync::OnceLock;

/// Reads the tool version from the banner of `add -?`.
///
/// Neither client has a version switch, but both print their version on
/// the first line of any help text:
/// `Team Explorer Everywhere Command Line Client (version 14.0.3.201603291047)`
#[derive(Debug, Clone, Default)]
pub struct GetVersion;

impl GetVersion {
    pub fn new() -> Self {
        Self
    }
}

impl TfvcCommand for GetVersion {
    /// `None` when the banner carries no recognizable version
    type Output = Option<TfvcVersion>;

    fn arguments(&self) -> ArgumentBuilder {
        let mut builder = ArgumentBuilder::new("add");
        builder.add_switch("?");
        builder
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        process_errors("add", result, true)?;

        let lines = split_into_lines(&result.stdout, true, true);
        Ok(lines.first().and_then(|line| version_from_banner(line)))
    }
}

fn version_from_banner(line: &str) -> Option<TfvcVersion> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"(?i)version\s+([\d.]*\d)").ok())
        .as_ref()?;
    let captures = pattern.captures(line)?;
    Some(TfvcVersion::from_string(captures.get(1)?.as_str()))
}
