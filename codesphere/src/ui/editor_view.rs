//! Editor panel rendering.
//!
//! Draws the active file's buffer with an optional line-number gutter,
//! positions the hardware cursor in insert mode, and dims the surface under
//! an "Analyzing structure..." overlay while a review is in flight.

use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;

use super::layout::{inner_rect, panel_block};

/// Renders the editor panel.
///
/// Viewport height is cached back into `state` first so the scroll
/// maintenance below (and the next keypress) can use it.
pub fn render_editor(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Editor;
    let title = {
        let file = state.workspace.active_file();
        format!(" {} [{}] ", file.name, file.language.label())
    };

    let inner = inner_rect(area);
    state.editor_viewport_height = inner.height;
    if state.mode == Mode::Insert {
        state
            .editor
            .ensure_cursor_visible(inner.height, state.options.scroll_margin);
    }

    frame.render_widget(panel_block(title, is_focused, theme), area);

    let scroll = state.editor.scroll as usize;
    let gutter_width = if state.options.line_numbers {
        // Wide enough for the last line number plus one space.
        state.editor.line_count().to_string().len() + 1
    } else {
        0
    };

    let mut lines: Vec<Line> = Vec::with_capacity(inner.height as usize);
    for (idx, text) in state
        .editor
        .lines()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(inner.height as usize)
    {
        let mut spans = Vec::with_capacity(2);
        if gutter_width > 0 {
            spans.push(Span::styled(
                format!("{:>width$} ", idx + 1, width = gutter_width - 1),
                Style::default().fg(theme.line_number),
            ));
        }
        spans.push(Span::styled(
            text.clone(),
            Style::default().fg(theme.editor_fg),
        ));
        lines.push(Line::from(spans));
    }

    let mut paragraph = Paragraph::new(Text::from(lines));
    if state.options.word_wrap {
        paragraph = paragraph.wrap(Wrap { trim: false });
    }
    frame.render_widget(paragraph, inner);

    // Hardware cursor only in insert mode on the focused editor.
    if is_focused && state.mode == Mode::Insert {
        let (row, col) = state.editor.cursor();
        if row >= scroll && row - scroll < inner.height as usize && inner.width > 0 {
            let x = (inner.x + gutter_width as u16 + col as u16)
                .min(inner.right().saturating_sub(1));
            let y = inner.y + (row - scroll) as u16;
            frame.set_cursor_position(Position { x, y });
        }
    }

    if state.loading {
        render_loading_overlay(frame, inner, theme);
    }
}

/// Centered "Analyzing structure..." badge above the editor surface.
fn render_loading_overlay(frame: &mut Frame, inner: Rect, theme: &Theme) {
    let label = " Analyzing structure... ";
    let width = (label.len() as u16 + 2).min(inner.width);
    let overlay = Rect {
        x: inner.x + (inner.width.saturating_sub(width)) / 2,
        y: inner.y + inner.height / 2,
        width,
        height: 1,
    };
    frame.render_widget(Clear, overlay);
    frame.render_widget(
        Paragraph::new(Span::styled(
            label,
            Style::default()
                .fg(theme.toast_fg)
                .bg(theme.border_active)
                .add_modifier(Modifier::BOLD),
        )),
        overlay,
    );
}
