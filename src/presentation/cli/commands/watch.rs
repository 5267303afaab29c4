use anyhow::Result;
use colored::Colorize;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::application::services::WorkspaceSession;
use crate::application::use_cases::watch_workspace::{WatchConfig, WatchWorkspaceUseCase};
use crate::domain::entities::resource::ResourceGroup;

/// Handler for the watch command
pub struct WatchCommand {
    pub interval: Option<u64>,
}

impl WatchCommand {
    pub fn new(interval: Option<u64>) -> Self {
        Self { interval }
    }

    pub async fn execute(&self, session: &WorkspaceSession) -> Result<()> {
        let interval = self.interval.or(session.settings().poll_interval_secs);
        let config = WatchConfig::new().with_poll_interval_secs(interval);
        let use_case = WatchWorkspaceUseCase::new(session.model().clone(), config);

        // Print every update
        let mut updates = session.model().subscribe();
        let printer = tokio::spawn(async move {
            loop {
                match updates.recv().await {
                    Ok(groups) => print_summary(&groups),
                    Err(RecvError::Lagged(skipped)) => warn!("Skipped {} updates", skipped),
                    Err(RecvError::Closed) => break,
                }
            }
        });

        // Stop on Ctrl-C
        let handle = use_case.handle();
        let stopper = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.stop();
            }
        });

        println!(
            "{} Watching {} (Ctrl-C to stop)",
            "::".blue().bold(),
            session.root().display()
        );
        let result = use_case.execute(session.root()).await;

        printer.abort();
        stopper.abort();
        Ok(result?)
    }
}

fn print_summary(groups: &[ResourceGroup]) {
    let summary = groups
        .iter()
        .map(|group| format!("{} {}", group.kind.label(), group.len()))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{} {} {}",
        chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
        "↻".cyan(),
        summary
    );
}
