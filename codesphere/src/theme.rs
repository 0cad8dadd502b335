//! Color theme system for codesphere.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI
//! surface. Two built-in themes exist, matching the persisted
//! [`ThemeKind`]:
//!
//! - `light` — ANSI 16 colors on the terminal's own background, so it works
//!   on any terminal including 256-color SSH sessions.
//! - `dark` — slate/indigo palette in RGB; requires truecolor, degrades to
//!   the nearest 256-color approximation elsewhere.

use codesphere_core::types::ThemeKind;
use ratatui::style::Color;

/// All color values used across the UI surfaces.
///
/// Every field is a `ratatui::style::Color`. Callers use `theme.field`
/// directly inside `Style::default().fg(theme.border_active)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Tab strip
    /// Foreground for the active tab.
    pub tab_active: Color,
    /// Foreground for inactive tabs.
    pub tab_inactive: Color,

    // Editor surface
    /// Main code text.
    pub editor_fg: Color,
    /// Gutter line numbers.
    pub line_number: Color,

    // Risk / score accents
    /// Low risk, high scores.
    pub risk_low: Color,
    /// Moderate risk, middling scores.
    pub risk_moderate: Color,
    /// High risk, low scores.
    pub risk_high: Color,

    // Toasts
    /// Background for success toasts.
    pub toast_success: Color,
    /// Background for error toasts.
    pub toast_error: Color,
    /// Toast text.
    pub toast_fg: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Mode indicator color when in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color when in INSERT mode.
    pub status_mode_insert: Color,

    // General
    /// Secondary text (placeholders, timestamps, hints).
    pub text_dim: Color,
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in light theme using ANSI 16 colors.
    ///
    /// Works on all terminals: 16-color, 256-color, and truecolor. The
    /// default when no theme has been persisted yet.
    pub fn light() -> Self {
        Self {
            border_active: Color::Blue,
            border_inactive: Color::DarkGray,

            tab_active: Color::Blue,
            tab_inactive: Color::DarkGray,

            editor_fg: Color::Reset,
            line_number: Color::DarkGray,

            risk_low: Color::Green,
            risk_moderate: Color::Yellow,
            risk_high: Color::Red,

            toast_success: Color::DarkGray,
            toast_error: Color::Red,
            toast_fg: Color::White,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Blue,
            status_mode_insert: Color::Green,

            text_dim: Color::DarkGray,
            background: Color::Reset,
        }
    }

    /// Returns the dark theme using RGB truecolor values.
    ///
    /// Slate/indigo palette. Colors degrade to the nearest ANSI 256-color
    /// approximation on non-truecolor terminals, at reduced fidelity.
    pub fn dark() -> Self {
        let slate_900 = Color::Rgb(15, 23, 42);
        let slate_800 = Color::Rgb(30, 41, 59);
        let slate_500 = Color::Rgb(100, 116, 139);
        let slate_200 = Color::Rgb(226, 232, 240);
        let indigo = Color::Rgb(129, 140, 248);
        let emerald = Color::Rgb(52, 211, 153);
        let amber = Color::Rgb(251, 191, 36);
        let rose = Color::Rgb(244, 63, 94);

        Self {
            border_active: indigo,
            border_inactive: slate_500,

            tab_active: indigo,
            tab_inactive: slate_500,

            editor_fg: slate_200,
            line_number: slate_500,

            risk_low: emerald,
            risk_moderate: amber,
            risk_high: rose,

            toast_success: slate_800,
            toast_error: rose,
            toast_fg: slate_200,

            status_bar_bg: slate_800,
            status_bar_fg: slate_200,
            status_mode_normal: indigo,
            status_mode_insert: emerald,

            text_dim: slate_500,
            background: slate_900,
        }
    }

    /// Resolves the persisted theme kind to the corresponding built-in.
    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Light => Self::light(),
            ThemeKind::Dark => Self::dark(),
        }
    }
}
