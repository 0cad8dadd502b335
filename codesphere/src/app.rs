//! Central application state for codesphere.
//!
//! This module binds the core workspace model to the UI: the current mode,
//! which panel has focus, per-panel scroll offsets and viewport heights, the
//! editor buffer, the toast queue, and the `loading` flag for the single
//! in-flight review. No ratatui rendering logic lives here — `app.rs` is
//! state that is read by the render module and mutated by the keybinding
//! dispatcher.
//!
//! Every mutating intent that touches a persisted slice (files, active id,
//! theme, history) flushes that slice to the store as a fire-and-forget
//! task; persistence failures are logged inside the store and never stop
//! the session.

use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use codesphere_core::notify::{Severity, ToastQueue};
use codesphere_core::review::ReviewClient;
use codesphere_core::store::{Store, KEY_ACTIVE_FILE, KEY_FILES, KEY_HISTORY, KEY_THEME};
use codesphere_core::types::{AnalysisResult, HistoryEntry, ThemeKind};
use codesphere_core::workspace::{WorkspaceError, WorkspaceState};

use crate::config::EditorOptions;
use crate::editor::EditorBuffer;
use crate::event::{AppEvent, ReviewDone};

/// Editor mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal navigation mode (default).
    #[default]
    Normal,
    /// Text insertion mode — keystrokes edit the active file.
    Insert,
    /// Full-screen help overlay shown above all panels.
    HelpOverlay,
}

/// Which panel currently has keyboard focus.
///
/// Navigation cycles Editor → Feedback → History → Editor via `next()` and
/// in reverse via `prev()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// The editor surface (left).
    #[default]
    Editor,
    /// The AI-insights feedback panel (upper right).
    Feedback,
    /// The review history panel (lower right).
    History,
}

impl PanelFocus {
    /// Returns the panel that precedes `self` in the cycle (wraps around).
    pub fn prev(self) -> Self {
        match self {
            PanelFocus::Editor => PanelFocus::History,
            PanelFocus::Feedback => PanelFocus::Editor,
            PanelFocus::History => PanelFocus::Feedback,
        }
    }

    /// Returns the panel that follows `self` in the cycle (wraps around).
    pub fn next(self) -> Self {
        match self {
            PanelFocus::Editor => PanelFocus::Feedback,
            PanelFocus::Feedback => PanelFocus::History,
            PanelFocus::History => PanelFocus::Editor,
        }
    }
}

/// All mutable application state passed through every render cycle.
///
/// The render function receives a single mutable reference (viewport heights
/// are cached back here) and the keybinding dispatcher receives the same.
pub struct AppState {
    /// The core workspace model: files, active selection, analyses, history.
    pub workspace: WorkspaceState,
    /// Live toast notifications, pruned on every logic tick.
    pub toasts: ToastQueue,
    /// Persisted theme selection; the render path resolves it to colors.
    pub theme_kind: ThemeKind,

    /// Current mode governing which keybindings are active.
    pub mode: Mode,
    /// Which panel currently receives scroll/navigation events.
    pub focus: PanelFocus,

    /// The editing widget bound to the active file's code.
    pub editor: EditorBuffer,
    /// Editor widget options from the config file.
    pub options: EditorOptions,

    /// True while a review is in flight. The Run and Clear controls are
    /// disabled while set; the state manager itself does not lock.
    pub loading: bool,
    /// Advances on each logic tick while loading (status-bar spinner).
    pub spinner_frame: usize,

    /// Vertical scroll offset for the feedback panel.
    pub feedback_scroll: u16,
    /// Vertical scroll offset for the history panel.
    pub history_scroll: u16,
    /// Vertical scroll offset for the help overlay.
    pub help_scroll: u16,

    /// Inner height of the editor panel, cached after each render.
    pub editor_viewport_height: u16,
    /// Inner height of the feedback panel, cached after each render.
    pub feedback_viewport_height: u16,
    /// Inner height of the history panel, cached after each render.
    pub history_viewport_height: u16,
    /// Outer rects of [editor, feedback, history], cached for click-to-focus.
    pub panel_rects: [Rect; 3],

    review: ReviewClient,
    store: Option<Store>,
    event_tx: UnboundedSender<AppEvent>,
}

impl AppState {
    /// Binds a hydrated workspace to the UI state.
    ///
    /// `store` is `None` when the persistent store could not be opened; the
    /// session then runs entirely in memory.
    pub fn new(
        workspace: WorkspaceState,
        theme_kind: ThemeKind,
        options: EditorOptions,
        review: ReviewClient,
        store: Option<Store>,
        event_tx: UnboundedSender<AppEvent>,
    ) -> Self {
        let editor = EditorBuffer::from_text(&workspace.active_file().code);
        Self {
            workspace,
            toasts: ToastQueue::new(),
            theme_kind,
            mode: Mode::default(),
            focus: PanelFocus::default(),
            editor,
            options,
            loading: false,
            spinner_frame: 0,
            feedback_scroll: 0,
            history_scroll: 0,
            help_scroll: 0,
            editor_viewport_height: 0,
            feedback_viewport_height: 0,
            history_viewport_height: 0,
            panel_rects: [Rect::default(); 3],
            review,
            store,
            event_tx,
        }
    }

    /// Queues a toast expiring 3 s from now.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.toasts.push(message, severity, Instant::now());
    }

    /// Logic tick (4 Hz): expires toasts and advances the loading spinner.
    pub fn on_tick(&mut self) {
        self.toasts.prune(Instant::now());
        if self.loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    // -----------------------------------------------------------------------
    // Workspace intents
    // -----------------------------------------------------------------------

    /// Rebuilds the editor buffer from the active file after a tab change.
    fn sync_editor(&mut self) {
        self.editor = EditorBuffer::from_text(&self.workspace.active_file().code);
        self.feedback_scroll = 0;
    }

    /// Writes the editor buffer through to the active file wholesale.
    ///
    /// Called after every editing keystroke; invalidates the file's cached
    /// analysis via the workspace transition.
    pub fn apply_edit(&mut self) {
        let id = self.workspace.active_id().to_owned();
        self.workspace.edit_code(&id, self.editor.to_text());
        self.flush_files();
    }

    /// Opens a new untitled file and focuses it.
    pub fn create_file(&mut self) {
        self.workspace.create_file();
        self.sync_editor();
        self.flush_files();
        self.flush_active();
    }

    /// Closes the active tab, refusing to close the last one.
    pub fn close_active_file(&mut self) {
        let id = self.workspace.active_id().to_owned();
        match self.workspace.close_file(&id) {
            Ok(()) => {
                self.sync_editor();
                self.flush_files();
                self.flush_active();
            }
            Err(WorkspaceError::LastFile) => {
                self.notify("Cannot close the last file.", Severity::Error);
            }
            Err(err) => {
                tracing::debug!("close_file rejected: {err}");
            }
        }
    }

    /// Activates the next tab in order.
    pub fn next_tab(&mut self) {
        self.workspace.activate_next();
        self.sync_editor();
        self.flush_active();
    }

    /// Activates the previous tab in order.
    pub fn prev_tab(&mut self) {
        self.workspace.activate_prev();
        self.sync_editor();
        self.flush_active();
    }

    /// Cycles the active file's language tag through the selector order.
    pub fn cycle_language(&mut self) {
        let (id, next) = {
            let file = self.workspace.active_file();
            (file.id.clone(), file.language.next())
        };
        self.workspace.set_language(&id, next);
        self.flush_files();
    }

    /// Flips the persisted theme.
    pub fn toggle_theme(&mut self) {
        self.theme_kind = self.theme_kind.toggled();
        self.flush_theme();
    }

    /// Empties the active file. Disabled while a review is in flight.
    pub fn clear_editor(&mut self) {
        if self.loading {
            return;
        }
        let id = self.workspace.active_id().to_owned();
        self.editor = EditorBuffer::from_text("");
        self.workspace.edit_code(&id, String::new());
        self.flush_files();
        self.notify("Editor cleared", Severity::Success);
    }

    // -----------------------------------------------------------------------
    // Review flow
    // -----------------------------------------------------------------------

    /// Starts a review of the active file.
    ///
    /// Refused while one is already in flight (the presentation layer also
    /// renders the control disabled). An empty buffer produces a toast and
    /// no network activity, no loading transition, and no history entry.
    /// Otherwise the file id, name, and language are captured now and the
    /// client call is spawned; its result arrives as
    /// [`AppEvent::ReviewResult`] regardless of what the user does meanwhile.
    pub fn run_review(&mut self) {
        if self.loading {
            return;
        }
        let (file_id, file_name, language, code) = {
            let file = self.workspace.active_file();
            (file.id.clone(), file.name.clone(), file.language, file.code.clone())
        };
        if code.trim().is_empty() {
            self.notify("Editor is empty. Write some code first!", Severity::Error);
            return;
        }

        self.loading = true;
        let client = self.review.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = client.review(language, &code).await;
            let _ = tx.send(AppEvent::ReviewResult(Box::new(ReviewDone {
                file_id,
                file_name,
                language,
                outcome,
            })));
        });
    }

    /// Merges a completed review into the workspace.
    ///
    /// The analysis is keyed by the file id captured at call time; the
    /// history entry snapshots name/language from the same moment. Whatever
    /// happens, `loading` is cleared — no path leaves it stuck.
    pub fn apply_review_result(&mut self, done: ReviewDone) {
        self.loading = false;
        match done.outcome {
            Ok(outcome) => {
                let result = AnalysisResult::from_outcome(outcome);
                let entry = HistoryEntry {
                    id: uuid::Uuid::new_v4().to_string(),
                    file_name: done.file_name,
                    timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
                    language: done.language,
                    score: result.score,
                    risk: result.risk,
                };
                self.workspace.insert_analysis(done.file_id, result);
                self.workspace.record_review(entry);
                self.flush_history();
                self.feedback_scroll = 0;
                self.notify("Analysis complete!", Severity::Success);
            }
            Err(err) => {
                tracing::error!("review flow failed: {err}");
                self.notify("A critical error occurred.", Severity::Error);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    /// Scrolls the focused panel down by `lines` rows.
    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Editor => {
                let max = self.editor.line_count().saturating_sub(1) as u16;
                self.editor.scroll = self.editor.scroll.saturating_add(lines).min(max);
            }
            PanelFocus::Feedback => {
                self.feedback_scroll = self.feedback_scroll.saturating_add(lines);
            }
            PanelFocus::History => {
                self.history_scroll = self.history_scroll.saturating_add(lines);
            }
        }
    }

    /// Scrolls the focused panel up by `lines` rows.
    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Editor => {
                self.editor.scroll = self.editor.scroll.saturating_sub(lines);
            }
            PanelFocus::Feedback => {
                self.feedback_scroll = self.feedback_scroll.saturating_sub(lines);
            }
            PanelFocus::History => {
                self.history_scroll = self.history_scroll.saturating_sub(lines);
            }
        }
    }

    /// Scrolls the focused panel to the top.
    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Editor => self.editor.scroll = 0,
            PanelFocus::Feedback => self.feedback_scroll = 0,
            PanelFocus::History => self.history_scroll = 0,
        }
    }

    /// Scrolls the focused panel to the bottom (ratatui clamps overshoot).
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Editor => {
                self.editor.scroll = self.editor.line_count().saturating_sub(1) as u16;
            }
            PanelFocus::Feedback => self.feedback_scroll = u16::MAX,
            PanelFocus::History => self.history_scroll = u16::MAX,
        }
    }

    // -----------------------------------------------------------------------
    // Store flushes — one independent fire-and-forget write per slice.
    // -----------------------------------------------------------------------

    fn flush<T>(&self, key: &'static str, value: T)
    where
        T: serde::Serialize + Send + Sync + 'static,
    {
        let Some(store) = self.store.clone() else {
            return;
        };
        tokio::spawn(async move {
            store.write(key, &value).await;
        });
    }

    fn flush_files(&self) {
        self.flush(KEY_FILES, self.workspace.files().to_vec());
    }

    fn flush_active(&self) {
        self.flush(KEY_ACTIVE_FILE, self.workspace.active_id().to_owned());
    }

    fn flush_theme(&self) {
        self.flush(KEY_THEME, self.theme_kind);
    }

    fn flush_history(&self) {
        self.flush(KEY_HISTORY, self.workspace.history().to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::sync::mpsc;

    // Connections to port 9 are refused immediately, so the fallback engages
    // without waiting out a timeout.
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/api/review";

    fn test_app() -> (AppState, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let review =
            ReviewClient::new(DEAD_ENDPOINT).with_simulated_latency(Duration::ZERO);
        let app = AppState::new(
            WorkspaceState::new(),
            ThemeKind::Light,
            EditorOptions::default(),
            review,
            None,
            tx,
        );
        (app, rx)
    }

    #[tokio::test]
    async fn empty_buffer_review_notifies_and_spawns_nothing() {
        let (mut app, mut rx) = test_app();
        let id = app.workspace.active_id().to_owned();
        app.workspace.edit_code(&id, "   \n ".to_owned());

        app.run_review();

        assert!(!app.loading);
        assert!(app.workspace.history().is_empty());
        let toast = &app.toasts.visible()[0];
        assert!(toast.message.starts_with("Editor is empty"));
        assert_eq!(toast.severity, Severity::Error);
        assert!(rx.try_recv().is_err(), "no review task should have started");
    }

    #[tokio::test]
    async fn failed_backend_still_yields_a_simulated_result() {
        let (mut app, mut rx) = test_app();
        let id = app.workspace.active_id().to_owned();
        app.workspace.edit_code(&id, "x = 1".to_owned());

        app.run_review();
        assert!(app.loading);

        let event = rx.recv().await.expect("review task should report back");
        let AppEvent::ReviewResult(done) = event else {
            panic!("expected a review result");
        };
        app.apply_review_result(*done);

        assert!(!app.loading);
        let analysis = app.workspace.analysis_for(&id).expect("analysis stored");
        assert!((6..=9).contains(&analysis.score));
        assert_eq!(app.workspace.history().len(), 1);
        assert_eq!(app.workspace.history()[0].score, analysis.score);
        assert!(app
            .toasts
            .visible()
            .iter()
            .any(|t| t.message == "Analysis complete!"));
    }

    #[tokio::test]
    async fn a_second_run_is_refused_while_one_is_in_flight() {
        let (mut app, mut rx) = test_app();
        let id = app.workspace.active_id().to_owned();
        app.workspace.edit_code(&id, "x = 1".to_owned());

        app.run_review();
        app.run_review();

        let _first = rx.recv().await.expect("first review completes");
        assert!(rx.try_recv().is_err(), "second run must not have spawned");
    }

    #[tokio::test]
    async fn result_lands_on_the_file_captured_at_call_time() {
        let (mut app, mut rx) = test_app();
        let original = app.workspace.active_id().to_owned();
        app.workspace.edit_code(&original, "let a = 2;".to_owned());

        app.run_review();
        // Switch tabs while the review is pending; the pending call is not
        // cancelled and must not follow the selection.
        app.create_file();
        assert_ne!(app.workspace.active_id(), original);

        let AppEvent::ReviewResult(done) = rx.recv().await.unwrap() else {
            panic!("expected a review result");
        };
        app.apply_review_result(*done);

        assert!(app.workspace.analysis_for(&original).is_some());
        assert!(app.workspace.active_analysis().is_none());
        assert_eq!(app.workspace.history()[0].file_name, "main.js");
    }

    #[tokio::test]
    async fn closing_the_last_file_toasts_instead_of_closing() {
        let (mut app, _rx) = test_app();
        app.close_active_file();
        assert_eq!(app.workspace.files().len(), 1);
        assert_eq!(app.toasts.visible()[0].message, "Cannot close the last file.");
    }

    #[tokio::test]
    async fn clear_editor_is_disabled_while_loading() {
        let (mut app, _rx) = test_app();
        let id = app.workspace.active_id().to_owned();
        app.workspace.edit_code(&id, "x = 1".to_owned());
        app.loading = true;

        app.clear_editor();

        assert_eq!(app.workspace.active_file().code, "x = 1");
        assert!(app.toasts.is_empty());
    }

    #[tokio::test]
    async fn editing_through_the_widget_invalidates_the_analysis() {
        let (mut app, mut rx) = test_app();
        let id = app.workspace.active_id().to_owned();
        app.workspace.edit_code(&id, "x = 1".to_owned());
        app.run_review();
        let AppEvent::ReviewResult(done) = rx.recv().await.unwrap() else {
            panic!("expected a review result");
        };
        app.apply_review_result(*done);
        assert!(app.workspace.analysis_for(&id).is_some());

        app.editor.insert_char('y');
        app.apply_edit();
        assert!(app.workspace.analysis_for(&id).is_none());
    }
}
