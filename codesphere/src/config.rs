//! Startup configuration for codesphere.
//!
//! Loaded once from `~/.config/codesphere/config.toml`. Config errors are
//! soft failures — a missing or unparsable file falls back to defaults and
//! is logged, never fatal. The theme is deliberately NOT configured here: it
//! is a runtime toggle persisted in the workspace store.

use serde::Deserialize;

/// Editor widget options.
///
/// A closed, enumerated field set rather than an open-ended table: unknown
/// keys in the config file are ignored by serde, and the widget reads only
/// these fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Spaces inserted per Tab keypress.
    pub tab_width: u8,
    /// Render the line-number gutter.
    pub line_numbers: bool,
    /// Soft-wrap long lines in the editor panel.
    pub word_wrap: bool,
    /// Rows kept visible above/below the cursor while scrolling.
    pub scroll_margin: u8,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            tab_width: 2,
            line_numbers: true,
            word_wrap: false,
            scroll_margin: 3,
        }
    }
}

/// Top-level config file shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorOptions,
    /// Overrides the review backend endpoint.
    pub review_endpoint: Option<String>,
}

/// Returns the path to the codesphere config file.
///
/// Prefers `$XDG_CONFIG_HOME/codesphere/config.toml`; falls back to
/// `~/.config/codesphere/config.toml` when the env var is absent.
pub fn config_path() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| std::path::PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| std::path::PathBuf::from(".config"));
    base.join("codesphere").join("config.toml")
}

/// Loads the config, falling back to defaults on any failure.
pub fn load() -> Config {
    let path = config_path();
    let raw = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(_) => return Config::default(),
    };
    match toml::from_str(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("config parse error in {:?}: {}", path, e);
            Config::default()
        }
    }
}
