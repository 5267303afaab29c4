//! Error classification and output parsing shared by every TF command.

use crate::common::error::{TfvcError, TfvcErrorCode};
use crate::common::result::TfvcResult;
use crate::infrastructure::process::ExecutionResult;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

/// Which output stream a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

struct ErrorRule {
    stream: Stream,
    pattern: Regex,
    code: TfvcErrorCode,
    message: &'static str,
}

const RULES: &[(Stream, &str, TfvcErrorCode, &str)] = &[
    (
        Stream::Stderr,
        r"Authentication failed",
        TfvcErrorCode::AuthenticationFailed,
        "Authentication failed. Check your credentials and try again.",
    ),
    (
        Stream::Stderr,
        r"(?i)workspace could not be determined|Unable to determine the source control server|project collection URL to use could not be determined",
        TfvcErrorCode::NotATfvcRepository,
        "The folder is not part of a TFVC workspace.",
    ),
    (
        Stream::Stderr,
        r"(?i)Repository not found",
        TfvcErrorCode::RepositoryNotFound,
        "The repository could not be found on the server.",
    ),
    (
        Stream::Stderr,
        r"(?i)Access denied connecting.*authenticating as OAuth",
        TfvcErrorCode::AuthenticationFailed,
        "Access denied. The token does not have the scopes required by the TF command line client.",
    ),
    (
        Stream::Stderr,
        r"(?i)'java' is not recognized as an internal or external command",
        TfvcErrorCode::NotFound,
        "Java could not be found. The TF command line client requires a Java runtime.",
    ),
    (
        Stream::Stdout,
        r"(?i)Error occurred during initialization of VM",
        TfvcErrorCode::NotFound,
        "The Java virtual machine failed to start.",
    ),
    (
        Stream::Stderr,
        r"(?i)There is no working folder mapping",
        TfvcErrorCode::FileNotInMappings,
        "The path is not in any working folder mapping.",
    ),
    (
        Stream::Stderr,
        r"(?i)could not be found in your workspace, or you do not have permission",
        TfvcErrorCode::FileNotInWorkspace,
        "The path could not be found in the workspace.",
    ),
    (
        Stream::Stderr,
        r"(?i)TF30063: You are not authorized to access",
        TfvcErrorCode::NotAuthorizedToAccess,
        "You are not authorized to access the collection.",
    ),
    (
        Stream::Stderr,
        r"(?i)configuration file .* (is invalid|could not be read|is corrupt)|Error reading configuration",
        TfvcErrorCode::BadConfig,
        "The TF configuration file is invalid.",
    ),
    (
        Stream::Stderr,
        r"(?i)(could not|unable to|cannot) create .*pipe",
        TfvcErrorCode::PipeCreationFailed,
        "The TF process could not create its standard input pipe.",
    ),
    (
        Stream::Stderr,
        r"(?i)TF\d+: .*language|non-English|Unrecognized command",
        TfvcErrorCode::WrongLocale,
        "The TF command line client must be the English language build.",
    ),
];

fn rules() -> &'static [ErrorRule] {
    static COMPILED: OnceLock<Vec<ErrorRule>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .filter_map(|(stream, pattern, code, message)| match Regex::new(pattern) {
                Ok(pattern) => Some(ErrorRule {
                    stream: *stream,
                    pattern,
                    code: *code,
                    message: *message,
                }),
                Err(e) => {
                    warn!("Skipping invalid error pattern '{}': {}", pattern, e);
                    None
                }
            })
            .collect()
    })
}

/// Categorize a finished command. A zero exit code is always `Ok`.
///
/// Rules are tried in order and the first match decides the code. Anything
/// unmatched becomes `ExecutionFailed` with the raw output attached; with
/// `show_first_error` its message is the first non-empty stderr line.
pub fn process_errors(
    command: &str,
    result: &ExecutionResult,
    show_first_error: bool,
) -> TfvcResult<()> {
    if result.exit_code == 0 {
        return Ok(());
    }

    let matched = rules().iter().find(|rule| {
        let text = match rule.stream {
            Stream::Stdout => &result.stdout,
            Stream::Stderr => &result.stderr,
        };
        rule.pattern.is_match(text)
    });

    let (code, message) = match matched {
        Some(rule) => (rule.code, rule.message.to_string()),
        None => {
            let first_line = result
                .stderr
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty());
            let message = match first_line {
                Some(line) if show_first_error => line.to_string(),
                _ => format!("Command exited with code {}", result.exit_code),
            };
            (TfvcErrorCode::ExecutionFailed, message)
        }
    };

    warn!(exit_code = result.exit_code, %code, "tf {} failed: {}", command, message);

    Err(TfvcError::command_error_with_output(
        message,
        code,
        command,
        result.exit_code,
        result.stdout.clone(),
        result.stderr.clone(),
    ))
}

/// Changeset number from `Changeset #123 checked in.`
pub fn parse_changeset_number(stdout: &str) -> Option<u64> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"Changeset #(\d+)").ok())
        .as_ref()?;
    pattern
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Walk a folder/file listing as printed by `add` and `undo`.
///
/// A line ending in `:` names the folder for the lines that follow; any
/// other line is handed to `file_of` and the file name it returns is joined
/// to the current folder.
pub fn parse_folder_listing<F>(lines: &[String], file_of: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<&str>,
{
    let mut folder = PathBuf::new();
    let mut files = Vec::new();

    for line in lines {
        if let Some(path) = line.strip_suffix(':') {
            folder = PathBuf::from(path);
        } else if let Some(file) = file_of(line) {
            files.push(join_to_folder(&folder, file));
        }
    }
    files
}

fn join_to_folder(folder: &Path, file: &str) -> PathBuf {
    if folder.as_os_str().is_empty() {
        PathBuf::from(file)
    } else {
        folder.join(file)
    }
}
