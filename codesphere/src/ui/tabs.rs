//! Editor tab strip.
//!
//! One row listing every open file in order, the active tab emphasized, a
//! trailing `+` hinting at the new-tab key. Clicking is not wired here —
//! tab switching is keyboard-driven (Tab / BackTab).

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme::Theme;

/// Renders the tab strip across the top row.
pub fn render_tab_strip(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let active_id = state.workspace.active_id().to_owned();
    let mut spans: Vec<Span> = Vec::new();

    for file in state.workspace.files() {
        let is_active = file.id == active_id;
        let style = if is_active {
            Style::default()
                .fg(theme.tab_active)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.tab_inactive)
        };
        spans.push(Span::styled(format!("  {} ×", file.name), style));
    }
    spans.push(Span::styled("  [+]", Style::default().fg(theme.text_dim)));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.background)),
        area,
    );
}
