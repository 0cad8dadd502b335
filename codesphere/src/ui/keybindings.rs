//! Keybinding dispatcher for codesphere.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` intents and returns
//! a `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so Normal, Insert, and the
//! help overlay each have an isolated handler.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// Mutates `state` in place and returns a `KeyAction`. The event loop calls
/// this once per received key; the next render tick picks up the changes.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event while in Normal mode.
///
/// Scroll keys are tried first; everything else maps one key to one intent.
/// The run and clear intents themselves refuse to act while a review is in
/// flight, so no loading check is duplicated here.
fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Review flow
        KeyCode::Enter if ctrl => {
            state.run_review();
            KeyAction::Continue
        }
        KeyCode::Char('r') => {
            state.run_review();
            KeyAction::Continue
        }
        KeyCode::Char('c') => {
            state.clear_editor();
            KeyAction::Continue
        }

        // Editing
        KeyCode::Char('i') => {
            state.focus = PanelFocus::Editor;
            state.mode = Mode::Insert;
            KeyAction::Continue
        }
        KeyCode::Enter if state.focus == PanelFocus::Editor => {
            state.mode = Mode::Insert;
            KeyAction::Continue
        }

        // Tabs
        KeyCode::Tab => {
            state.next_tab();
            KeyAction::Continue
        }
        KeyCode::BackTab => {
            state.prev_tab();
            KeyAction::Continue
        }
        KeyCode::Char('n') => {
            state.create_file();
            KeyAction::Continue
        }
        KeyCode::Char('x') => {
            state.close_active_file();
            KeyAction::Continue
        }

        // Workspace toggles
        KeyCode::Char('t') => {
            state.toggle_theme();
            KeyAction::Continue
        }
        KeyCode::Char('L') => {
            state.cycle_language();
            KeyAction::Continue
        }

        // Panel focus
        KeyCode::Char('h') => {
            state.focus = state.focus.prev();
            KeyAction::Continue
        }
        KeyCode::Char('l') => {
            state.focus = state.focus.next();
            KeyAction::Continue
        }

        // Help overlay
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }

        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,

        _ => KeyAction::Continue,
    }
}

/// Handles scroll keys in Normal mode: j / k / g / G.
///
/// Returns `Some(KeyAction)` when the key was consumed, `None` when it
/// should fall through to the rest of the Normal handler.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.scroll_down(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.scroll_up(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('g') => {
            state.scroll_top();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('G') => {
            state.scroll_bottom();
            Some(KeyAction::Continue)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Handles a key event while editing the active file.
///
/// Every mutation is written through to the workspace wholesale, which also
/// invalidates the file's cached analysis. Ctrl+Enter runs a review without
/// leaving insert mode — the keybinding registered on the editing widget.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
        }
        KeyCode::Enter if ctrl => {
            state.run_review();
        }
        KeyCode::Enter => {
            state.editor.insert_newline();
            state.apply_edit();
        }
        KeyCode::Backspace => {
            state.editor.backspace();
            state.apply_edit();
        }
        KeyCode::Delete => {
            state.editor.delete_forward();
            state.apply_edit();
        }
        KeyCode::Tab => {
            state.editor.insert_tab(state.options.tab_width);
            state.apply_edit();
        }
        KeyCode::Left => state.editor.move_left(),
        KeyCode::Right => state.editor.move_right(),
        KeyCode::Up => state.editor.move_up(),
        KeyCode::Down => state.editor.move_down(),
        KeyCode::Home => state.editor.move_line_start(),
        KeyCode::End => state.editor.move_line_end(),
        KeyCode::Char(c) if !ctrl => {
            state.editor.insert_char(c);
            state.apply_edit();
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is visible.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: click-to-focus and scroll-wheel.
///
/// Left click on a panel focuses it (collapsed zero-width panels cannot be
/// clicked). The wheel scrolls the focused panel by 3 lines, or the help
/// overlay when it is open.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let [editor, feedback, history] = state.panel_rects;
            if editor.width > 0 && editor.contains(pos) {
                state.focus = PanelFocus::Editor;
            } else if feedback.width > 0 && feedback.contains(pos) {
                state.focus = PanelFocus::Feedback;
            } else if history.width > 0 && history.contains(pos) {
                state.focus = PanelFocus::History;
            }
        }
        MouseEventKind::ScrollUp => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            } else {
                state.scroll_up(3);
            }
        }
        MouseEventKind::ScrollDown => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_add(3);
            } else {
                state.scroll_down(3);
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesphere_core::review::ReviewClient;
    use codesphere_core::types::{Language, ThemeKind};
    use codesphere_core::workspace::WorkspaceState;

    use crate::config::EditorOptions;

    fn test_state() -> AppState {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        AppState::new(
            WorkspaceState::new(),
            ThemeKind::Light,
            EditorOptions::default(),
            ReviewClient::default(),
            None,
            tx,
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_and_other_keys_continue() {
        let mut state = test_state();
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Quit);
        assert_eq!(handle_key(press(KeyCode::Char('z')), &mut state), KeyAction::Continue);
    }

    #[test]
    fn n_opens_a_tab_and_tab_cycles() {
        let mut state = test_state();
        let first = state.workspace.active_id().to_owned();
        handle_key(press(KeyCode::Char('n')), &mut state);
        assert_eq!(state.workspace.files().len(), 2);
        handle_key(press(KeyCode::Tab), &mut state);
        assert_eq!(state.workspace.active_id(), first);
    }

    #[test]
    fn insert_mode_round_trip_edits_the_workspace() {
        let mut state = test_state();
        handle_key(press(KeyCode::Char('i')), &mut state);
        assert_eq!(state.mode, Mode::Insert);

        handle_key(press(KeyCode::Char('z')), &mut state);
        assert!(state.workspace.active_file().code.starts_with('z'));

        handle_key(press(KeyCode::Esc), &mut state);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn shift_l_cycles_the_language() {
        let mut state = test_state();
        handle_key(press(KeyCode::Char('L')), &mut state);
        assert_eq!(state.workspace.active_file().language, Language::Typescript);
    }

    #[test]
    fn theme_toggle_flips_the_kind() {
        let mut state = test_state();
        handle_key(press(KeyCode::Char('t')), &mut state);
        assert_eq!(state.theme_kind, ThemeKind::Dark);
    }

    #[test]
    fn help_overlay_opens_and_closes() {
        let mut state = test_state();
        handle_key(press(KeyCode::Char('?')), &mut state);
        assert_eq!(state.mode, Mode::HelpOverlay);
        handle_key(press(KeyCode::Esc), &mut state);
        assert_eq!(state.mode, Mode::Normal);
    }
}
