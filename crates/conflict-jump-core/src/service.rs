//! Runs a [`ConflictNavigator`] on its own task.
//!
//! Commands, timer firings and scan results are all funnelled into one
//! `select!` loop, so the navigator sees them strictly one at a time. Scans
//! run on their own task and report back tagged with the generation the
//! navigator handed out when they started.

use crate::config::Settings;
use crate::document::Document;
use crate::error::NavigatorError;
use crate::host::{EditorHost, StatusSink, WorkspaceEnumerator};
use crate::message::Command;
use crate::navigator::{ConflictNavigator, TimerAction};
use crate::scheduler::TokioScheduler;
use crate::status::StatusBar;
use crate::workspace::{scan_workspace, ScanReport};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

const COMMAND_BUFFER: usize = 64;

/// Cloneable sender side of a running navigator service.
#[derive(Debug, Clone)]
pub struct NavigatorHandle {
    tx: mpsc::Sender<Command>,
}

impl NavigatorHandle {
    pub async fn send(&self, command: Command) -> Result<(), NavigatorError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| NavigatorError::ServiceStopped)
    }

    pub async fn document_changed(&self, document: Document) -> Result<(), NavigatorError> {
        self.send(Command::DocumentChanged(document)).await
    }

    pub async fn active_editor_changed(&self) -> Result<(), NavigatorError> {
        self.send(Command::ActiveEditorChanged).await
    }

    pub async fn jump_to_next_conflict(&self) -> Result<(), NavigatorError> {
        self.send(Command::JumpToNextConflict).await
    }

    pub async fn jump_to_previous_conflict(&self) -> Result<(), NavigatorError> {
        self.send(Command::JumpToPreviousConflict).await
    }

    pub async fn open_next_conflicted_file(&self) -> Result<(), NavigatorError> {
        self.send(Command::OpenNextConflictedFile).await
    }

    pub async fn show_conflict_status(&self) -> Result<(), NavigatorError> {
        self.send(Command::ShowConflictStatus).await
    }

    pub async fn config_changed(&self, settings: Settings) -> Result<(), NavigatorError> {
        self.send(Command::ConfigChanged(settings)).await
    }

    pub async fn scan_workspace(&self) -> Result<(), NavigatorError> {
        self.send(Command::ScanWorkspace).await
    }
}

/// Start the navigator task and kick off the initial workspace scan.
///
/// The task runs until every [`NavigatorHandle`] is dropped or `shutdown`
/// fires, then cancels its pending timers.
pub fn spawn_service<H: EditorHost>(
    settings: Settings,
    host: H,
    status: Box<dyn StatusSink>,
    workspace: Arc<dyn WorkspaceEnumerator>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(NavigatorHandle, JoinHandle<()>), NavigatorError> {
    let (scheduler, mut timers) = TokioScheduler::<TimerAction>::new();
    let status = StatusBar::new(status, settings.show_status_bar);
    let mut navigator = ConflictNavigator::new(settings, host, scheduler, status)?;

    let (tx, mut commands) = mpsc::channel(COMMAND_BUFFER);
    let (scan_tx, mut scans) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        tracing::info!("Conflict navigator started");
        start_scan(&mut navigator, &workspace, &scan_tx);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    tracing::debug!(command = %command, "handling command");
                    match command {
                        Command::DocumentChanged(document) => navigator.on_document_changed(document),
                        Command::ActiveEditorChanged => navigator.on_active_editor_changed(),
                        Command::JumpToNextConflict => navigator.jump_to_next_conflict().await,
                        Command::JumpToPreviousConflict => navigator.jump_to_previous_conflict(),
                        Command::OpenNextConflictedFile => navigator.open_next_conflicted_file().await,
                        Command::ShowConflictStatus => navigator.show_conflict_status(),
                        Command::ConfigChanged(settings) => {
                            if let Err(e) = navigator.reload_config(settings) {
                                tracing::warn!(error = %e, "ignoring invalid configuration");
                            }
                        }
                        Command::ScanWorkspace => start_scan(&mut navigator, &workspace, &scan_tx),
                    }
                }
                Some(fired) = timers.recv() => navigator.handle_timer(fired).await,
                Some((generation, report)) = scans.recv() => navigator.apply_scan(generation, report),
                _ = shutdown.recv() => break,
            }
        }

        navigator.dispose();
        tracing::info!("Conflict navigator stopped");
    });

    Ok((NavigatorHandle { tx }, task))
}

/// Scan off the navigator task; the report is applied when it arrives.
fn start_scan<H: EditorHost>(
    navigator: &mut ConflictNavigator<H, TokioScheduler<TimerAction>>,
    workspace: &Arc<dyn WorkspaceEnumerator>,
    results: &mpsc::UnboundedSender<(u64, ScanReport)>,
) {
    let generation = navigator.begin_scan();
    let detector = navigator.detector().clone();
    let exclude = navigator.settings().exclude.clone();
    let workspace = workspace.clone();
    let results = results.clone();
    tokio::spawn(async move {
        match scan_workspace(workspace.as_ref(), &detector, &exclude).await {
            Ok(report) => {
                let _ = results.send((generation, report));
            }
            Err(e) => tracing::error!(error = %e, "Workspace scan failed"),
        }
    });
}
