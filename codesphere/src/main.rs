//! codesphere — terminal code-review workspace.
//!
//! Entry point for the `codesphere` binary. Wires together the terminal
//! lifecycle (`tui`), unified event bus (`event`), application state
//! (`app`), rendering (`ui`), theme system (`theme`), and the shared
//! WAL-mode SQLite key-value store (`codesphere-core`).
//!
//! # Startup sequence (order matters)
//!
//! 1. Create the data directory and point tracing at the log file — stdout
//!    belongs to the TUI, so diagnostics must never reach it.
//! 2. Load config — read-only, safe before terminal init.
//! 3. Open the store and hydrate the workspace BEFORE the first frame, so
//!    there is no "loading" state to manage. A store failure degrades to an
//!    in-memory session rather than aborting.
//! 4. `install_panic_hook()` — installed before raw mode so a panic restores
//!    the terminal before the message prints.
//! 5. `register_sigterm()` — returns `Arc<AtomicBool>` polled in the loop.
//! 6. `init_tui()` — enters alternate screen and enables raw mode.
//! 7. Create the event channel and `spawn_event_task()`.
//!
//! # Safety
//!
//! The event loop exits only via `break`, never via `?`, so `restore_tui()`
//! is always reached — covering normal quit, SIGTERM, and channel close.
//! The panic hook handles the panic path separately.

mod app;
mod config;
mod editor;
mod event;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use codesphere_core::review::ReviewClient;
use codesphere_core::store::{self, KEY_ACTIVE_FILE, KEY_FILES, KEY_HISTORY, KEY_THEME};
use codesphere_core::types::ThemeKind;
use codesphere_core::workspace::WorkspaceState;

use ui::keybindings::{handle_key, handle_mouse, KeyAction};

const DATA_DIR: &str = ".codesphere";
const STORE_PATH: &str = ".codesphere/workspace.db";
const LOG_PATH: &str = ".codesphere/codesphere.log";

/// Routes tracing output to the log file; stdout stays clean for the TUI.
fn init_tracing() -> anyhow::Result<()> {
    let log_file = std::fs::File::create(LOG_PATH)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("codesphere=info,codesphere_core=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(log_file)))
        .with(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    std::fs::create_dir_all(DATA_DIR)?;
    init_tracing()?;

    let cfg = config::load();
    let review = match cfg.review_endpoint {
        Some(endpoint) => ReviewClient::new(endpoint),
        None => ReviewClient::default(),
    };

    // Open the store and hydrate before drawing the first frame. A failed
    // open is a degraded session, not a fatal error — every slice simply
    // stays in memory.
    let store = match store::open_store(STORE_PATH).await {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!("persistent store unavailable: {err}; running in-memory");
            None
        }
    };
    let (theme_kind, files, active_id, history) = match &store {
        Some(store) => (
            store.read(KEY_THEME, ThemeKind::default()).await,
            store.read(KEY_FILES, Vec::new()).await,
            store.read(KEY_ACTIVE_FILE, String::new()).await,
            store.read(KEY_HISTORY, Vec::new()).await,
        ),
        None => (ThemeKind::default(), Vec::new(), String::new(), Vec::new()),
    };
    let workspace = WorkspaceState::hydrate(files, active_id, history);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm();
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let mut state = app::AppState::new(
        workspace,
        theme_kind,
        cfg.editor,
        review,
        store,
        handler.tx.clone(),
    );

    // Event loop — exits only via `break`, never via `?`, which guarantees
    // `restore_tui()` is always reached after the loop.
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: guarantees SIGTERM is checked at least every 50ms,
            // even when no crossterm/tick/render events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        let theme = theme::Theme::from_kind(state.theme_kind);
                        if let Err(err) =
                            terminal.draw(|frame| ui::render(frame, &mut state, &theme))
                        {
                            tracing::error!("draw failed: {err}");
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, &mut state);
                    }
                    Some(event::AppEvent::Tick) => state.on_tick(),
                    Some(event::AppEvent::ReviewResult(done)) => {
                        state.apply_review_result(*done);
                    }
                    Some(event::AppEvent::Resize(_, _)) => {
                        // Handled automatically by ratatui on the next Render:
                        // frame.area() returns the new terminal size.
                    }
                    Some(event::AppEvent::Quit) | None => break 'event_loop,
                }
                // Check SIGTERM after every event too, not just the heartbeat,
                // so quit latency is at most one event cycle rather than 50ms.
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    // Restore the terminal at the single exit point of the loop.
    tui::restore_tui()?;
    Ok(())
}
