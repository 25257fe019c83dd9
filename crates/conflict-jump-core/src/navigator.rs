//! Conflict navigation state machine.
//!
//! The navigator owns all mutable state (marker configuration, per-file
//! conflict counts, pending timers) and is driven from one task: host
//! notifications, user commands and timer firings are all method calls on
//! `&mut self`, so nothing here needs a lock.
//!
//! Auto-navigation works in two stages. Every edit re-arms that document's
//! change-debounce timer with the latest snapshot; when it fires the
//! snapshot is classified against the previous count. A partial resolution
//! arms the auto-jump timer to move to the next conflict in the same file, a
//! full resolution arms it to open the next conflicted file. Both actions
//! re-check at fire time that the user is still in the file they resolved.

use crate::config::Settings;
use crate::document::{display_name, Document};
use crate::error::NavigatorError;
use crate::host::EditorHost;
use crate::scheduler::{Fired, Scheduler, TimerKey};
use crate::status::StatusBar;
use crate::tracker::{ChangeOutcome, ResolutionTracker};
use crate::workspace::ScanReport;
use conflict_markers::{ConflictDetector, ConflictIndex};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Deferred work carried by the navigator's timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    /// Classify a debounced edit.
    ProcessChange(Document),
    /// Move to the next conflict in `path` if it is still active.
    JumpToNext { path: PathBuf },
    /// Open the next conflicted file if `from` is still active.
    OpenNextFile { from: PathBuf },
}

pub struct ConflictNavigator<H, S> {
    settings: Settings,
    detector: ConflictDetector,
    tracker: ResolutionTracker,
    status: StatusBar,
    host: H,
    scheduler: S,
    disposed: bool,
    /// Bumped by every scan start; only the latest scan's report is applied.
    scan_generation: u64,
    /// Paths classified since the latest scan started.
    changed_since_scan: HashSet<PathBuf>,
}

impl<H, S> ConflictNavigator<H, S>
where
    H: EditorHost,
    S: Scheduler<TimerAction>,
{
    pub fn new(
        settings: Settings,
        host: H,
        scheduler: S,
        mut status: StatusBar,
    ) -> Result<Self, NavigatorError> {
        let detector = ConflictDetector::new(settings.conflict_markers.clone())?;
        status.set_enabled(settings.show_status_bar);
        Ok(Self {
            settings,
            detector,
            tracker: ResolutionTracker::new(),
            status,
            host,
            scheduler,
            disposed: false,
            scan_generation: 0,
            changed_since_scan: HashSet::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn detector(&self) -> &ConflictDetector {
        &self.detector
    }

    pub fn tracker(&self) -> &ResolutionTracker {
        &self.tracker
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Apply changed settings. Invalid markers leave the old settings in place.
    pub fn reload_config(&mut self, settings: Settings) -> Result<(), NavigatorError> {
        self.detector.set_markers(settings.conflict_markers.clone())?;
        self.status.set_enabled(settings.show_status_bar);
        self.settings = settings;
        self.refresh_status();
        info!("configuration reloaded");
        Ok(())
    }

    pub async fn jump_to_next_conflict(&mut self) {
        let Some((path, cursor, index)) = self.active_scan() else {
            self.host.show_info("No active editor");
            return;
        };

        match index.find_next(cursor as i64) {
            Some(block) => self.reveal(&path, block.start_line, &index, "Conflict"),
            None => {
                self.host.show_info("No more conflicts in this file");
                if self.settings.auto_open_next_file {
                    self.open_next_conflicted_file().await;
                }
            }
        }
    }

    pub fn jump_to_previous_conflict(&mut self) {
        let Some((path, cursor, index)) = self.active_scan() else {
            self.host.show_info("No active editor");
            return;
        };

        match index.find_previous(cursor as i64) {
            Some(block) => self.reveal(&path, block.start_line, &index, "Conflict"),
            None => self.host.show_info("No previous conflicts in this file"),
        }
    }

    /// Open the conflicted file after the active one and move to its first conflict.
    pub async fn open_next_conflicted_file(&mut self) {
        let current = self.host.active_editor().map(|e| e.path);
        let Some(next) = self
            .tracker
            .next_file_after(current.as_deref())
            .map(Path::to_path_buf)
        else {
            self.host.show_info("No conflicted files found in workspace");
            return;
        };

        let document = match self.host.open_document(&next).await {
            Ok(document) => document,
            Err(e) => {
                warn!(path = %next.display(), error = %e, "failed to open conflicted file");
                self.host
                    .show_info(&format!("Could not open {}", display_name(&next)));
                return;
            }
        };

        let line = self
            .detector
            .detect(&document)
            .find_next(-1)
            .map_or(0, |b| b.start_line);
        debug!(path = %next.display(), line, "opening next conflicted file");
        self.host.navigate(&next, line);
    }

    /// Multi-line summary of the tracked conflicts.
    pub fn conflict_status(&self) -> String {
        let mut report = String::from("Conflict Status:\n\n");
        let _ = writeln!(
            report,
            "Total conflicted files: {}",
            self.tracker.file_count()
        );
        if let Some(document) = self.host.active_document() {
            let _ = writeln!(
                report,
                "Current file conflicts: {}",
                self.detector.count(&document)
            );
        }
        report.push_str("\nConflicted files:\n");
        for (i, path) in self.tracker.conflicted_files().iter().enumerate() {
            let _ = writeln!(report, "{}. {}", i + 1, display_name(path));
        }
        report
    }

    pub fn show_conflict_status(&mut self) {
        let report = self.conflict_status();
        self.host.show_info(&report);
    }

    /// Record an edit. Classification happens once the debounce delay passes
    /// without another edit to the same document.
    pub fn on_document_changed(&mut self, document: Document) {
        if self.disposed {
            return;
        }
        self.scheduler.schedule(
            TimerKey::ChangeDebounce(document.path().to_path_buf()),
            self.settings.debounce_duration(),
            TimerAction::ProcessChange(document),
        );
    }

    pub fn on_active_editor_changed(&mut self) {
        self.refresh_status();
    }

    /// Mark the start of a workspace scan. Returns the generation to pass
    /// back to [`apply_scan`](Self::apply_scan) with its report.
    pub fn begin_scan(&mut self) -> u64 {
        self.scan_generation += 1;
        self.changed_since_scan.clear();
        self.scan_generation
    }

    /// Replace tracked state with a completed workspace scan.
    ///
    /// Reports from a scan that was superseded by a later one are dropped.
    /// Files classified while the scan ran keep their tracked counts.
    pub fn apply_scan(&mut self, generation: u64, report: ScanReport) {
        if generation != self.scan_generation {
            debug!(
                generation,
                latest = self.scan_generation,
                "discarding superseded scan"
            );
            return;
        }
        info!(
            conflicted = report.files.len(),
            scanned = report.scanned,
            skipped = report.skipped,
            changed = self.changed_since_scan.len(),
            "workspace scan applied"
        );
        self.tracker
            .merge_scan(report.files, &self.changed_since_scan);
        self.changed_since_scan.clear();
        self.refresh_status();
    }

    /// Handle an expired timer delivered by the scheduler.
    pub async fn handle_timer(&mut self, fired: Fired<TimerAction>) {
        if self.disposed {
            return;
        }
        let Some(action) = self.scheduler.claim(fired) else {
            return;
        };

        match action {
            TimerAction::ProcessChange(document) => {
                self.process_change(&document);
            }
            TimerAction::JumpToNext { path } => self.auto_jump(&path),
            TimerAction::OpenNextFile { from } => {
                if !self.is_active(&from) {
                    debug!(path = %from.display(), "stale auto-open, editor changed");
                    return;
                }
                if self.tracker.is_empty() {
                    return;
                }
                self.open_next_conflicted_file().await;
            }
        }
    }

    /// Cancel every pending timer. Later notifications and firings are ignored.
    pub fn dispose(&mut self) {
        self.scheduler.cancel_all();
        self.disposed = true;
        debug!("navigator disposed");
    }

    /// Classify one document snapshot and arm auto-navigation if it resolved something.
    pub(crate) fn process_change(&mut self, document: &Document) -> ChangeOutcome {
        let path = document.path().to_path_buf();
        let count = self.detector.count(document);
        let outcome = self.tracker.on_change(&path, count);
        self.changed_since_scan.insert(path.clone());
        debug!(path = %path.display(), count, outcome = %outcome, "document classified");

        match outcome {
            ChangeOutcome::PartiallyResolved if self.settings.auto_jump_enabled => {
                self.scheduler.schedule(
                    TimerKey::AutoJump,
                    self.settings.auto_jump_duration(),
                    TimerAction::JumpToNext { path },
                );
            }
            ChangeOutcome::FullyResolved => {
                self.host.show_info(&format!(
                    "All conflicts resolved in {}!",
                    document.file_name()
                ));
                if self.settings.auto_jump_enabled
                    && self.settings.auto_open_next_file
                    && !self.tracker.is_empty()
                {
                    self.scheduler.schedule(
                        TimerKey::AutoJump,
                        self.settings.auto_jump_duration(),
                        TimerAction::OpenNextFile { from: path },
                    );
                }
            }
            _ => {}
        }

        self.refresh_status();
        outcome
    }

    fn auto_jump(&mut self, path: &Path) {
        if !self.is_active(path) {
            debug!(path = %path.display(), "stale auto-jump, editor changed");
            return;
        }
        let Some((path, cursor, index)) = self.active_scan() else {
            return;
        };
        if let Some(block) = index.find_next(cursor as i64) {
            self.reveal(&path, block.start_line, &index, "Auto-jumped to conflict");
        }
    }

    /// Active editor's path, cursor line and a fresh scan of its document.
    fn active_scan(&self) -> Option<(PathBuf, usize, ConflictIndex)> {
        let editor = self.host.active_editor()?;
        let document = self.host.active_document()?;
        Some((
            editor.path,
            editor.cursor_line,
            self.detector.detect(&document),
        ))
    }

    fn is_active(&self, path: &Path) -> bool {
        self.host
            .active_editor()
            .is_some_and(|editor| editor.path == path)
    }

    fn reveal(&mut self, path: &Path, line: usize, index: &ConflictIndex, label: &str) {
        self.host.navigate(path, line);
        self.host.show_info(&format!(
            "{label} {} of {}",
            index.index_of(line),
            index.count()
        ));
    }

    fn refresh_status(&mut self) {
        self.status.update(self.tracker.total_conflicts());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryHost, MemoryStatus};
    use crate::scheduler::VirtualScheduler;
    use std::time::Duration;

    const TWO: &str = "<<<<<<<\na\n=======\nb\n>>>>>>>\nc\n<<<<<<<\nd\n=======\ne\n>>>>>>>";
    const ONE: &str = "c\n<<<<<<<\nd\n=======\ne\n>>>>>>>";
    const NONE: &str = "a\nb\nc";

    type TestNavigator = ConflictNavigator<MemoryHost, VirtualScheduler<TimerAction>>;

    struct Fixture {
        nav: TestNavigator,
        host: MemoryHost,
        status: MemoryStatus,
    }

    fn fixture_with(settings: Settings) -> Fixture {
        let host = MemoryHost::new();
        let status = MemoryStatus::default();
        let nav = ConflictNavigator::new(
            settings,
            host.clone(),
            VirtualScheduler::new(),
            StatusBar::new(Box::new(status.clone()), true),
        )
        .unwrap();
        Fixture { nav, host, status }
    }

    fn fixture() -> Fixture {
        fixture_with(Settings::default())
    }

    fn debounce(path: &str) -> TimerKey {
        TimerKey::ChangeDebounce(PathBuf::from(path))
    }

    fn report(files: Vec<(&str, usize)>) -> ScanReport {
        ScanReport {
            files: files
                .into_iter()
                .map(|(p, n)| (PathBuf::from(p), n))
                .collect(),
            scanned: 0,
            skipped: 0,
            finished_at: chrono::Utc::now(),
        }
    }

    fn doc(path: &str, text: &str) -> Document {
        Document::from_text(path, text)
    }

    impl Fixture {
        /// Store the text and notify the navigator, as an editor would on edit.
        fn edit(&mut self, path: &str, text: &str) {
            let d = doc(path, text);
            self.host.put_document(d.clone());
            self.nav.on_document_changed(d);
        }

        /// Advance the virtual clock and feed expired timers back in.
        async fn advance(&mut self, ms: u64) {
            let fired = self
                .nav
                .scheduler_mut()
                .advance(Duration::from_millis(ms));
            for f in fired {
                self.nav.handle_timer(f).await;
            }
        }
    }

    #[tokio::test]
    async fn test_jump_next_without_editor() {
        let mut f = fixture();
        f.nav.jump_to_next_conflict().await;
        assert_eq!(f.host.last_message().unwrap(), "No active editor");
        assert!(f.host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_jump_previous_without_editor() {
        let mut f = fixture();
        f.nav.jump_to_previous_conflict();
        assert_eq!(f.host.last_message().unwrap(), "No active editor");
    }

    #[tokio::test]
    async fn test_auto_jump_after_editor_closed_is_noop() {
        let mut f = fixture();
        f.edit("a.txt", TWO);
        f.advance(300).await;
        f.host.focus("a.txt", 0);
        f.edit("a.txt", ONE);
        f.advance(300).await;

        f.host.close_editor();
        f.advance(2000).await;
        assert!(f.host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_jump_next_reports_position() {
        let mut f = fixture();
        f.host.put_document(doc("a.txt", TWO));
        f.host.focus("a.txt", 4);

        f.nav.jump_to_next_conflict().await;
        assert_eq!(f.host.navigations(), vec![(PathBuf::from("a.txt"), 6)]);
        assert_eq!(f.host.last_message().unwrap(), "Conflict 2 of 2");
    }

    #[tokio::test]
    async fn test_jump_next_wraps_past_last_conflict() {
        let mut f = fixture();
        f.host.put_document(doc("a.txt", TWO));
        f.host.focus("a.txt", 10);

        f.nav.jump_to_next_conflict().await;
        assert_eq!(f.host.navigations(), vec![(PathBuf::from("a.txt"), 0)]);
        assert_eq!(f.host.last_message().unwrap(), "Conflict 1 of 2");
    }

    #[tokio::test]
    async fn test_jump_previous_wraps_before_first_conflict() {
        let mut f = fixture();
        f.host.put_document(doc("a.txt", TWO));
        f.host.focus("a.txt", 0);

        f.nav.jump_to_previous_conflict();
        assert_eq!(f.host.navigations(), vec![(PathBuf::from("a.txt"), 6)]);
        assert_eq!(f.host.last_message().unwrap(), "Conflict 2 of 2");
    }

    #[tokio::test]
    async fn test_jump_previous_in_clean_file() {
        let mut f = fixture();
        f.host.put_document(doc("a.txt", NONE));
        f.host.focus("a.txt", 1);

        f.nav.jump_to_previous_conflict();
        assert_eq!(
            f.host.last_message().unwrap(),
            "No previous conflicts in this file"
        );
    }

    #[tokio::test]
    async fn test_jump_next_in_clean_file_opens_next_conflicted_file() {
        let mut f = fixture();
        f.host.put_document(doc("clean.txt", NONE));
        f.host.put_document(doc("b.txt", ONE));
        f.nav.process_change(&doc("b.txt", ONE));
        f.host.focus("clean.txt", 0);

        f.nav.jump_to_next_conflict().await;
        assert!(f
            .host
            .messages()
            .contains(&"No more conflicts in this file".to_string()));
        assert_eq!(f.host.navigations(), vec![(PathBuf::from("b.txt"), 1)]);
    }

    #[tokio::test]
    async fn test_jump_next_in_clean_file_stays_when_auto_open_disabled() {
        let mut f = fixture_with(Settings {
            auto_open_next_file: false,
            ..Settings::default()
        });
        f.host.put_document(doc("clean.txt", NONE));
        f.nav.process_change(&doc("b.txt", ONE));
        f.host.focus("clean.txt", 0);

        f.nav.jump_to_next_conflict().await;
        assert!(f.host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_open_next_with_no_conflicted_files() {
        let mut f = fixture();
        f.nav.open_next_conflicted_file().await;
        assert_eq!(
            f.host.last_message().unwrap(),
            "No conflicted files found in workspace"
        );
    }

    #[tokio::test]
    async fn test_open_next_cycles_through_files() {
        let mut f = fixture();
        for name in ["a.txt", "b.txt"] {
            f.host.put_document(doc(name, ONE));
            f.nav.process_change(&doc(name, ONE));
        }
        f.host.focus("a.txt", 0);

        f.nav.open_next_conflicted_file().await;
        f.nav.open_next_conflicted_file().await;
        assert_eq!(
            f.host.navigations(),
            vec![(PathBuf::from("b.txt"), 1), (PathBuf::from("a.txt"), 1)]
        );
    }

    #[tokio::test]
    async fn test_open_next_unreadable_file_reports() {
        let mut f = fixture();
        f.nav.process_change(&doc("gone.txt", ONE));
        f.nav.open_next_conflicted_file().await;
        assert_eq!(f.host.last_message().unwrap(), "Could not open gone.txt");
        assert!(f.host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_debounce_coalesces_to_last_snapshot() {
        let mut f = fixture();
        f.edit("a.txt", TWO);
        f.advance(100).await;
        f.edit("a.txt", NONE);
        f.advance(100).await;
        f.edit("a.txt", ONE);
        f.advance(299).await;
        assert!(f.nav.tracker().is_empty());

        f.advance(1).await;
        // Only the last snapshot was classified.
        assert_eq!(f.nav.tracker().count_for(Path::new("a.txt")), 1);
        assert!(!f.nav.scheduler().is_pending(&debounce("a.txt")));
        assert_eq!(f.status.current().unwrap().text, "1 conflict");
    }

    #[tokio::test]
    async fn test_partial_resolution_auto_jumps() {
        let mut f = fixture();
        f.edit("a.txt", TWO);
        f.advance(300).await;

        // User resolves the first conflict while sitting on line 0.
        f.host.focus("a.txt", 0);
        f.edit("a.txt", ONE);
        f.advance(300).await;
        assert!(f.nav.scheduler().is_pending(&TimerKey::AutoJump));
        assert!(f.host.navigations().is_empty());

        f.advance(2000).await;
        assert_eq!(f.host.navigations(), vec![(PathBuf::from("a.txt"), 1)]);
        assert_eq!(
            f.host.last_message().unwrap(),
            "Auto-jumped to conflict 1 of 1"
        );
    }

    #[tokio::test]
    async fn test_auto_jump_disabled() {
        let mut f = fixture_with(Settings {
            auto_jump_enabled: false,
            ..Settings::default()
        });
        f.edit("a.txt", TWO);
        f.advance(300).await;
        f.host.focus("a.txt", 0);
        f.edit("a.txt", ONE);
        f.advance(300).await;
        assert!(!f.nav.scheduler().is_pending(&TimerKey::AutoJump));
    }

    #[tokio::test]
    async fn test_stale_auto_jump_is_noop() {
        let mut f = fixture();
        f.edit("a.txt", TWO);
        f.advance(300).await;
        f.host.focus("a.txt", 0);
        f.edit("a.txt", ONE);
        f.advance(300).await;

        // User switches to another file before the jump fires.
        f.host.put_document(doc("other.txt", NONE));
        f.host.focus("other.txt", 0);
        f.advance(2000).await;
        assert!(f.host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_rearmed_auto_jump_only_latest_fires() {
        let mut f = fixture();
        f.edit("a.txt", TWO);
        f.edit("b.txt", TWO);
        f.advance(300).await;
        f.nav.process_change(&doc("a.txt", TWO));

        f.host.put_document(doc("a.txt", ONE));
        f.nav.process_change(&doc("a.txt", ONE));
        f.advance(1000).await;
        f.host.put_document(doc("b.txt", ONE));
        f.nav.process_change(&doc("b.txt", ONE));

        f.host.focus("a.txt", 0);
        f.advance(1000).await;
        // a.txt's jump was replaced by b.txt's, which has not fired yet.
        assert!(f.host.navigations().is_empty());

        f.host.focus("b.txt", 0);
        f.advance(1000).await;
        assert_eq!(f.host.navigations(), vec![(PathBuf::from("b.txt"), 1)]);
    }

    #[tokio::test]
    async fn test_full_resolution_opens_next_file() {
        let mut f = fixture();
        f.edit("a.txt", ONE);
        f.advance(300).await;
        f.host.put_document(doc("b.txt", TWO));
        f.nav.process_change(&doc("b.txt", TWO));

        f.host.focus("a.txt", 1);
        f.edit("a.txt", NONE);
        f.advance(300).await;
        assert_eq!(
            f.host.last_message().unwrap(),
            "All conflicts resolved in a.txt!"
        );
        assert_eq!(f.status.current().unwrap().text, "2 conflicts");

        f.advance(2000).await;
        assert_eq!(f.host.navigations(), vec![(PathBuf::from("b.txt"), 0)]);
    }

    #[tokio::test]
    async fn test_full_resolution_of_last_file_does_not_schedule() {
        let mut f = fixture();
        f.edit("a.txt", ONE);
        f.advance(300).await;
        f.host.focus("a.txt", 1);
        f.edit("a.txt", NONE);
        f.advance(300).await;
        assert!(!f.nav.scheduler().is_pending(&TimerKey::AutoJump));
        assert_eq!(f.status.current().unwrap().text, "No conflicts");
    }

    #[tokio::test]
    async fn test_dispose_cancels_timers() {
        let mut f = fixture();
        f.edit("a.txt", TWO);
        f.nav.dispose();
        assert!(!f.nav.scheduler().is_pending(&debounce("a.txt")));
        f.advance(5000).await;
        assert!(f.nav.tracker().is_empty());

        f.edit("a.txt", TWO);
        assert!(!f.nav.scheduler().is_pending(&debounce("a.txt")));
    }

    #[tokio::test]
    async fn test_reload_config_changes_markers_and_status() {
        let mut f = fixture();
        let custom = "<<< a\nx\n=== \ny\n>>> b";
        f.edit("a.txt", custom);
        f.advance(300).await;
        assert!(f.nav.tracker().is_empty());

        let mut settings = Settings::default();
        settings.conflict_markers = conflict_markers::MarkerSet::new("<<<", "===", ">>>").unwrap();
        settings.show_status_bar = false;
        f.nav.reload_config(settings).unwrap();
        assert!(!f.status.visible());

        f.edit("a.txt", custom);
        f.advance(300).await;
        assert_eq!(f.nav.tracker().count_for(Path::new("a.txt")), 1);
    }

    #[tokio::test]
    async fn test_reload_config_rejects_bad_markers() {
        let mut f = fixture();
        let mut settings = Settings::default();
        settings.conflict_markers.middle = String::new();
        settings.auto_jump_delay = 1;
        assert!(f.nav.reload_config(settings).is_err());
        assert_eq!(f.nav.settings().auto_jump_delay, 2000);
    }

    #[tokio::test]
    async fn test_conflict_status_report() {
        let mut f = fixture();
        f.host.put_document(doc("/repo/a.txt", TWO));
        f.nav.process_change(&doc("/repo/a.txt", TWO));
        f.nav.process_change(&doc("/repo/src/b.txt", ONE));
        f.host.focus("/repo/a.txt", 0);

        f.nav.show_conflict_status();
        let report = f.host.last_message().unwrap();
        assert!(report.contains("Total conflicted files: 2"));
        assert!(report.contains("Current file conflicts: 2"));
        assert!(report.contains("1. a.txt\n2. b.txt"));
    }

    #[tokio::test]
    async fn test_apply_scan_updates_status() {
        let mut f = fixture();
        let generation = f.nav.begin_scan();
        f.nav.apply_scan(generation, report(vec![("a", 2), ("b", 1)]));
        assert_eq!(f.nav.tracker().file_count(), 2);
        assert_eq!(f.status.current().unwrap().text, "3 conflicts");

        f.nav.on_active_editor_changed();
        assert_eq!(f.status.current().unwrap().text, "3 conflicts");
    }

    #[tokio::test]
    async fn test_edits_during_scan_survive_its_report() {
        let mut f = fixture();
        let generation = f.nav.begin_scan();

        // a.txt is introduced and then resolved while the scan is still reading.
        f.edit("a.txt", TWO);
        f.advance(300).await;
        f.edit("a.txt", NONE);
        f.advance(300).await;
        assert_eq!(
            f.host.last_message().unwrap(),
            "All conflicts resolved in a.txt!"
        );

        // The scan read a.txt before the resolution.
        f.nav
            .apply_scan(generation, report(vec![("a.txt", 2), ("b.txt", 1)]));
        assert!(!f.nav.tracker().contains(Path::new("a.txt")));
        assert_eq!(f.nav.tracker().conflicted_files(), [PathBuf::from("b.txt")]);
        assert_eq!(f.status.current().unwrap().text, "1 conflict");
    }

    #[tokio::test]
    async fn test_superseded_scan_report_is_dropped() {
        let mut f = fixture();
        let first = f.nav.begin_scan();
        let second = f.nav.begin_scan();

        f.nav.apply_scan(second, report(vec![("b.txt", 1)]));
        f.nav.apply_scan(first, report(vec![("a.txt", 2)]));
        assert_eq!(f.nav.tracker().conflicted_files(), [PathBuf::from("b.txt")]);
        assert_eq!(f.status.current().unwrap().text, "1 conflict");
    }

    #[tokio::test]
    async fn test_edits_to_different_files_debounce_separately() {
        let mut f = fixture();
        let generation = f.nav.begin_scan();
        f.nav
            .apply_scan(generation, report(vec![("a.txt", 1), ("b.txt", 1)]));

        f.edit("a.txt", NONE);
        f.advance(100).await;
        f.edit("b.txt", NONE);
        f.advance(200).await;
        assert!(!f.nav.tracker().contains(Path::new("a.txt")));
        assert!(f.nav.tracker().contains(Path::new("b.txt")));

        f.advance(100).await;
        assert!(f.nav.tracker().is_empty());
        assert_eq!(f.status.current().unwrap().text, "No conflicts");
        let resolved: Vec<_> = f
            .host
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("All conflicts resolved"))
            .collect();
        assert_eq!(
            resolved,
            vec![
                "All conflicts resolved in a.txt!".to_string(),
                "All conflicts resolved in b.txt!".to_string()
            ]
        );
    }
}
