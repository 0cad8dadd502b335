//! Responsive layout engine for codesphere.
//!
//! Pure layout arithmetic — no mutable application state lives here. Called
//! inside `terminal.draw()` on every render so every frame reflects the
//! current terminal size.
//!
//! # Panel geometry
//!
//! At `>= 100` columns the editor takes the left 62% and the insights column
//! (metric cards / feedback / history) the right 38%. Below 100 columns the
//! insights column collapses and the editor fills the full width; the
//! feedback is still reachable through the review toasts and history
//! persists for the next wide-terminal session.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single column and merge their
//! junction box-drawing characters automatically.

use ratatui::{
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use codesphere_core::stats::{self, CodeComplexity};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Spinner frames cycled by the logic tick while a review is in flight.
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Panel rects for the current frame.
pub struct AppLayout {
    pub tabs: Rect,
    pub editor: Rect,
    pub metrics: Rect,
    pub feedback: Rect,
    pub history: Rect,
    pub status_bar: Rect,
}

/// Computes all panel rects for the current frame.
///
/// The returned rects are valid only for the current draw closure — never
/// store them across frames (they are cached into `AppState.panel_rects`
/// each render precisely because of this).
pub fn compute_layout(frame: &Frame) -> AppLayout {
    let term_width = frame.area().width;

    // Vertical: 1-row tab strip, main area, 1-row status bar.
    let [tabs, main_area, status_bar] = frame.area().layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    // Horizontal: collapse the insights column when the terminal is narrow.
    let horizontal = if term_width >= 100 {
        Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
            .spacing(Spacing::Overlap(1))
    } else {
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(0)])
            .spacing(Spacing::Overlap(1))
    };
    let [editor, insights] = main_area.layout(&horizontal);

    let [metrics, feedback, history] = insights.layout(
        &Layout::vertical([
            Constraint::Length(6),
            Constraint::Fill(2),
            Constraint::Fill(1),
        ])
        .spacing(Spacing::Overlap(1)),
    );

    AppLayout { tabs, editor, metrics, feedback, history, status_bar }
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border.
///
/// Used to cache viewport heights in `AppState` before panels are rendered,
/// so scroll distances are available at keypress time.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// `BorderType::Thick` marks the focused panel; `MergeStrategy::Fuzzy` is
/// required because `Exact` produces incorrect junctions when mixing `Thick`
/// and `Plain` borders.
pub fn panel_block<'a>(
    title: impl Into<Line<'a>>,
    is_focused: bool,
    theme: &Theme,
) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar: mode indicator, in-flight review spinner,
/// active language, and the derived code statistics.
///
/// The statistics block is recomputed from the live buffer on every frame —
/// purely client-side, independent of review results.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };

    let file = state.workspace.active_file();
    let code_stats = stats::measure(&file.code);
    let complexity_fg = match code_stats.complexity {
        CodeComplexity::Low => theme.risk_low,
        CodeComplexity::Medium => theme.risk_moderate,
        CodeComplexity::High => theme.risk_high,
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];
    if state.loading {
        let glyph = SPINNER[state.spinner_frame % SPINNER.len()];
        spans.push(Span::styled(
            format!(" {glyph} Analyzing... "),
            Style::default().fg(theme.status_mode_insert),
        ));
    }
    spans.push(Span::raw(format!(
        "  {}  │  Lines: {}  Words: {}  Tokens: ~{}  Complexity: ",
        file.language.label(),
        code_stats.lines,
        code_stats.words,
        code_stats.tokens,
    )));
    spans.push(Span::styled(
        code_stats.complexity.label(),
        Style::default().fg(complexity_fg).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        "  │  ? help",
        Style::default().fg(theme.text_dim),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
