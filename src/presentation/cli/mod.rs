pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::exit;

use crate::application::services::{SessionOptions, WorkspaceSession};
use crate::common::error::TfvcError;
use crate::infrastructure::filesystem::settings_store::{LOCATION_VARIABLE, PROXY_VARIABLE};

use commands::{
    AddCommand, CheckinCommand, ShowCommand, StatusCommand, UndoCommand, VersionCommand,
    WatchCommand, WorkspaceCommand,
};

/// `--version` with the build metadata from build.rs
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    " for ",
    env!("BUILD_TARGET"),
    ")"
);

/// Output format options for status command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// tfvc-scm - Pending changes of a TFVC workspace through the TF command line client
#[derive(Parser)]
#[command(name = "tfvc-scm")]
#[command(about = "Inspect and manage TFVC pending changes through the TF command line client")]
#[command(version)]
#[command(long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TF command line tool (tf.exe or the Team Explorer Everywhere client)
    #[arg(long, global = true, env = LOCATION_VARIABLE)]
    pub tf_path: Option<PathBuf>,

    /// Proxy URL passed to the TF command line tool
    #[arg(long, global = true, env = PROXY_VARIABLE)]
    pub proxy: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Repository root (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show pending changes grouped into Merge, Included and Excluded
    Status {
        /// Move a path to the Excluded group (repeatable)
        #[arg(short, long)]
        exclude: Vec<PathBuf>,

        /// Output format (text, json, yaml)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show the TFVC workspace mapped to the repository root
    Workspace {
        /// Output format (text, json, yaml)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show the TF command line tool version
    Version,

    /// Keep the pending changes up to date while files change
    Watch {
        /// Also refresh every N seconds
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Pend adds for new files
    Add {
        /// Files to add
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Undo pending changes
    Undo {
        /// Files whose changes are undone
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Check in pending changes
    Checkin {
        /// Check-in comment
        #[arg(short = 'm', long)]
        comment: String,

        /// Work item to associate (repeatable)
        #[arg(short = 'w', long = "work-item")]
        work_items: Vec<u32>,

        /// Files to check in (all included changes when omitted)
        paths: Vec<PathBuf>,
    },

    /// Print the server content of an item
    Show {
        /// Local or server path
        path: String,

        /// Version spec such as C42 or T
        #[arg(long)]
        version: Option<String>,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn verbose(&self) -> bool {
        self.cli.verbose
    }

    pub async fn run(self) -> anyhow::Result<()> {
        // Set up colored output
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        // Handle the command
        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                if let Some(hint) = e.downcast_ref::<TfvcError>().and_then(hint_for) {
                    eprintln!("{} {}", "hint:".yellow().bold(), hint);
                }
                exit(1);
            }
        }
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        let session = self.open_session().await?;

        let result = match &self.cli.command {
            Commands::Status { exclude, output } => {
                StatusCommand::new(exclude.clone(), *output, self.cli.verbose)
                    .execute(&session)
                    .await
            }
            Commands::Workspace { output } => WorkspaceCommand::new(*output).execute(&session).await,
            Commands::Version => VersionCommand.execute(&session).await,
            Commands::Watch { interval } => WatchCommand::new(*interval).execute(&session).await,
            Commands::Add { paths } => AddCommand::new(paths.clone()).execute(&session).await,
            Commands::Undo { paths } => UndoCommand::new(paths.clone()).execute(&session).await,
            Commands::Checkin {
                comment,
                work_items,
                paths,
            } => {
                CheckinCommand::new(paths.clone(), comment.clone(), work_items.clone())
                    .execute(&session)
                    .await
            }
            Commands::Show { path, version } => {
                ShowCommand::new(path.clone(), version.clone())
                    .execute(&session)
                    .await
            }
        };

        session.dispose().await;
        result
    }

    /// Open the session for `-C` (or the current directory)
    async fn open_session(&self) -> anyhow::Result<WorkspaceSession> {
        let root = match &self.cli.directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        // Pre-warm only for the long-running watch
        let prewarm = matches!(self.cli.command, Commands::Watch { .. });
        let options = SessionOptions::new(root)
            .with_tool_path(self.cli.tf_path.clone())
            .with_proxy(self.cli.proxy.clone())
            .with_prewarm(prewarm);

        Ok(WorkspaceSession::open(options).await?)
    }
}

/// Follow-up advice for errors the user can fix
fn hint_for(error: &TfvcError) -> Option<String> {
    use crate::common::error::TfvcErrorCode;

    match error.code() {
        TfvcErrorCode::LocationMissing => Some(format!(
            "set `location` in .tfvc.yml, pass --tf-path or export {}",
            LOCATION_VARIABLE
        )),
        TfvcErrorCode::MinVersionWarning => {
            Some("update the TF command line client".to_string())
        }
        _ if error.needs_sign_in() => Some(
            "set `collection_url` and `username` in .tfvc.yml and export TFVC_PASSWORD".to_string(),
        ),
        _ if error.is_unavailable() => {
            Some("the directory is not mapped in a TFVC workspace".to_string())
        }
        _ => None,
    }
}
