//! Insights column: metric cards and the AI feedback panel.
//!
//! Strictly read-only over the workspace — scores, risk, and metrics all
//! come from the cached analysis; nothing here computes or re-derives them.

use ratatui::layout::{Constraint, Layout, Rect, Spacing};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use codesphere_core::types::{AnalysisResult, RiskLevel};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;

use super::layout::{inner_rect, panel_block};

/// Renders the two metric cards: quality score and risk level.
pub fn render_metrics(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [score_card, risk_card] = area.layout(
        &Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .spacing(Spacing::Overlap(1)),
    );
    let analysis = state.workspace.active_analysis();
    render_score_card(frame, score_card, analysis, theme);
    render_risk_card(frame, risk_card, analysis, theme);
}

/// Color for a score, mirroring the risk thresholds (8+ good, 6+ middling).
fn score_color(score: u8, theme: &Theme) -> ratatui::style::Color {
    if score >= 8 {
        theme.risk_low
    } else if score >= 6 {
        theme.risk_moderate
    } else {
        theme.risk_high
    }
}

fn risk_color(risk: RiskLevel, theme: &Theme) -> ratatui::style::Color {
    match risk {
        RiskLevel::Low => theme.risk_low,
        RiskLevel::Moderate => theme.risk_moderate,
        RiskLevel::High => theme.risk_high,
    }
}

fn render_score_card(
    frame: &mut Frame,
    area: Rect,
    analysis: Option<&AnalysisResult>,
    theme: &Theme,
) {
    frame.render_widget(panel_block(" Quality Score ", false, theme), area);
    let inner = inner_rect(area);

    let mut lines = Vec::with_capacity(2);
    match analysis {
        Some(result) => {
            let fg = score_color(result.score, theme);
            lines.push(Line::from(Span::styled(
                format!("{}/10", result.score),
                Style::default().fg(fg).add_modifier(Modifier::BOLD),
            )));
            // Filled progress bar proportional to score.
            let width = inner.width.saturating_sub(2) as usize;
            let filled = width * result.score as usize / 10;
            lines.push(Line::from(vec![
                Span::styled("█".repeat(filled), Style::default().fg(fg)),
                Span::styled("░".repeat(width - filled), Style::default().fg(theme.text_dim)),
            ]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "--",
                Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                "Awaiting scan",
                Style::default().fg(theme.text_dim),
            )));
        }
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn render_risk_card(
    frame: &mut Frame,
    area: Rect,
    analysis: Option<&AnalysisResult>,
    theme: &Theme,
) {
    frame.render_widget(panel_block(" Risk Level ", false, theme), area);
    let inner = inner_rect(area);

    let mut lines = Vec::with_capacity(2);
    match analysis {
        Some(result) => {
            lines.push(Line::from(Span::styled(
                result.risk.label(),
                Style::default()
                    .fg(risk_color(result.risk, theme))
                    .add_modifier(Modifier::BOLD),
            )));
            let bugs = result.metrics.bugs_detected;
            let (text, fg) = if bugs == 0 {
                ("Zero bugs detected".to_owned(), theme.risk_low)
            } else {
                (format!("{bugs} potential issues"), theme.risk_high)
            };
            lines.push(Line::from(Span::styled(text, Style::default().fg(fg))));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Pending",
                Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                "Awaiting scan",
                Style::default().fg(theme.text_dim),
            )));
        }
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

/// Renders the AI feedback panel.
///
/// While loading, shows skeleton bars instead of stale text; with no
/// analysis cached (never run, or invalidated by an edit), shows the
/// call-to-action placeholder.
pub fn render_feedback(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Feedback;
    frame.render_widget(panel_block(" AI Insights ", is_focused, theme), area);
    let inner = inner_rect(area);
    state.feedback_viewport_height = inner.height;

    if state.loading {
        let bar = |w: usize| {
            Line::from(Span::styled(
                "▒".repeat(w),
                Style::default().fg(theme.text_dim),
            ))
        };
        let width = inner.width as usize;
        let skeleton = Text::from(vec![
            bar(width),
            bar(width * 4 / 5),
            bar(width * 9 / 10),
        ]);
        frame.render_widget(Paragraph::new(skeleton), inner);
        return;
    }

    match state.workspace.active_analysis() {
        Some(result) => {
            let paragraph = Paragraph::new(result.feedback.clone())
                .style(Style::default().fg(theme.editor_fg))
                .wrap(Wrap { trim: false })
                .scroll((state.feedback_scroll, 0));
            frame.render_widget(paragraph, inner);
        }
        None => {
            let placeholder = Text::from(vec![
                Line::from(Span::styled(
                    "No analysis results yet.",
                    Style::default().fg(theme.text_dim),
                )),
                Line::from(Span::styled(
                    "Press Ctrl+Enter to run a review.",
                    Style::default().fg(theme.text_dim),
                )),
            ]);
            frame.render_widget(Paragraph::new(placeholder), inner);
        }
    }
}
