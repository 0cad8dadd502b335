//! Full-screen help overlay listing every keybinding.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme::Theme;

use super::layout::panel_block;

const BINDINGS: &[(&str, &str)] = &[
    ("i / Enter", "edit the active file (insert mode)"),
    ("Esc", "leave insert mode"),
    ("Ctrl+Enter / r", "run a review of the active file"),
    ("c", "clear the editor"),
    ("n", "new file tab"),
    ("x", "close the active tab"),
    ("Tab / Shift+Tab", "next / previous tab"),
    ("L", "cycle the file's language"),
    ("t", "toggle light / dark theme"),
    ("h / l", "cycle panel focus"),
    ("j / k", "scroll the focused panel"),
    ("g / G", "scroll to top / bottom"),
    ("?", "toggle this help"),
    ("q", "quit"),
];

/// Renders the help overlay centred above all panels.
pub fn render_help_overlay(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = frame.area();
    let width = 56.min(area.width.saturating_sub(4));
    let height = (BINDINGS.len() as u16 + 4).min(area.height.saturating_sub(2));
    if width == 0 || height == 0 {
        return;
    }
    let rect = Rect {
        x: (area.width - width) / 2,
        y: (area.height - height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, rect);
    frame.render_widget(panel_block(" Help ", true, theme), rect);

    let mut lines: Vec<Line> = Vec::with_capacity(BINDINGS.len() + 1);
    for (keys, action) in BINDINGS {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {keys:<16}"),
                Style::default()
                    .fg(theme.border_active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(*action),
        ]));
    }
    lines.push(Line::from(Span::styled(
        "  press ? or Esc to close",
        Style::default().fg(theme.text_dim),
    )));

    let inner = super::layout::inner_rect(rect);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).scroll((state.help_scroll, 0)),
        inner,
    );
}
