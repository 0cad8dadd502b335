//! UI rendering module for codesphere.
//!
//! Module root for `ui/`. Re-exports `render()` as the single entry point
//! called by the event loop's `terminal.draw()` closure. The presentation
//! layer is a pure function of [`AppState`] — it never computes scores or
//! mutates the workspace; the only writes back into state are cached
//! viewport geometry for the next keypress cycle.

mod layout;
pub mod editor_view;
pub mod help;
pub mod history;
pub mod insights;
pub mod keybindings;
pub mod tabs;
pub mod toasts;

use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::compute_layout;

/// Renders one complete frame: tab strip, editor, insights column, status
/// bar, toast overlay, and (when active) the help overlay.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()` —
/// the only location where `terminal.draw()` is invoked.
///
/// Panel rects are written back into `state` so click-to-focus and scroll
/// distance calculations on the *next* keypress see this frame's geometry.
/// The one-frame lag is imperceptible in practice.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        frame.area(),
    );

    let layout = compute_layout(frame);
    state.panel_rects = [layout.editor, layout.feedback, layout.history];

    tabs::render_tab_strip(frame, layout.tabs, state, theme);
    editor_view::render_editor(frame, layout.editor, state, theme);

    // The insights column collapses on narrow terminals.
    if layout.feedback.width > 0 {
        insights::render_metrics(frame, layout.metrics, state, theme);
        insights::render_feedback(frame, layout.feedback, state, theme);
        history::render_history(frame, layout.history, state, theme);
    }

    layout::render_status_bar(frame, layout.status_bar, state, theme);

    // Toasts float above the panels, anchored bottom-right.
    toasts::render_toasts(frame, state, theme);

    // Help overlay last so it sits on top of everything.
    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, state, theme);
    }
}
