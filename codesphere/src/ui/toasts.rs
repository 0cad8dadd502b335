//! Toast notification overlay.
//!
//! Floats above all panels in the bottom-right corner, stacking upwards in
//! insertion order (oldest closest to the status bar). Expiry is handled by
//! the toast queue on the logic tick — this module only draws what is live.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};
use ratatui::Frame;

use codesphere_core::notify::Severity;

use crate::app::AppState;
use crate::theme::Theme;

const TOAST_WIDTH: u16 = 42;
const TOAST_HEIGHT: u16 = 3;

/// Renders every live toast.
pub fn render_toasts(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = frame.area();
    let width = TOAST_WIDTH.min(area.width.saturating_sub(4));
    if width == 0 {
        return;
    }

    for (i, toast) in state.toasts.visible().iter().enumerate() {
        let offset = (i as u16 + 1) * TOAST_HEIGHT + 1;
        if offset + TOAST_HEIGHT > area.height {
            break;
        }
        let rect = Rect {
            x: area.width.saturating_sub(width + 2),
            y: area.height.saturating_sub(offset + 1),
            width,
            height: TOAST_HEIGHT,
        };

        let bg = match toast.severity {
            Severity::Success => theme.toast_success,
            Severity::Error => theme.toast_error,
        };
        let style = Style::default().bg(bg).fg(theme.toast_fg);

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Span::raw(toast.message.clone()))
                .block(Block::bordered().border_type(BorderType::Rounded).style(style)),
            rect,
        );
    }
}
