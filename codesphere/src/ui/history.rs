//! Review history panel.
//!
//! Renders the bounded list of past reviews, newest first. Entries are
//! immutable snapshots — a file shown here may long since be closed or
//! renamed, and that is fine.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use codesphere_core::types::RiskLevel;

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;

use super::layout::{inner_rect, panel_block};

/// Renders the history panel (lower right).
pub fn render_history(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::History;
    let title = format!(" Recent Analyses ({} scans) ", state.workspace.history().len());
    frame.render_widget(panel_block(title, is_focused, theme), area);
    let inner = inner_rect(area);
    state.history_viewport_height = inner.height;

    if state.workspace.history().is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No history recorded.",
                Style::default().fg(theme.text_dim),
            )),
            inner,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for entry in state.workspace.history() {
        let risk_fg = match entry.risk {
            RiskLevel::Low => theme.risk_low,
            RiskLevel::Moderate => theme.risk_moderate,
            RiskLevel::High => theme.risk_high,
        };
        lines.push(Line::from(vec![
            Span::styled(
                entry.file_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", entry.timestamp),
                Style::default().fg(theme.text_dim),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}", entry.language.label()),
                Style::default().fg(theme.tab_active),
            ),
            Span::raw(format!("  Score: {}/10  ", entry.score)),
            Span::styled(entry.risk.label(), Style::default().fg(risk_fg)),
        ]));
    }

    let paragraph = Paragraph::new(Text::from(lines)).scroll((state.history_scroll, 0));
    frame.render_widget(paragraph, inner);
}
