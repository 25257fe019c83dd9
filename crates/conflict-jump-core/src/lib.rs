pub mod config;
pub mod document;
pub mod error;
pub mod host;
pub mod logging;
pub mod memory;
pub mod message;
pub mod navigator;
pub mod scheduler;
pub mod service;
pub mod status;
pub mod tracker;
pub mod workspace;

pub use config::Settings;
pub use document::Document;
pub use error::NavigatorError;
pub use host::{ActiveEditor, EditorHost, StatusSink, WorkspaceEnumerator};
pub use message::Command;
pub use navigator::{ConflictNavigator, TimerAction};
pub use scheduler::{Scheduler, TimerKey, TokioScheduler, VirtualScheduler};
pub use service::{spawn_service, NavigatorHandle};
pub use status::{StatusBar, StatusText};
pub use tracker::{ChangeOutcome, ResolutionTracker};
pub use workspace::{scan_workspace, FsWorkspace, ScanReport};
