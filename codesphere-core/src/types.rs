use serde::{Deserialize, Serialize};

/// Language tag attached to an open file.
///
/// The set matches the backend's supported review targets. Serialized
/// lowercase because the review endpoint and the persisted file collection
/// both carry the lowercase form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Javascript,
    Typescript,
    Python,
    Java,
    Go,
}

impl Language {
    /// Lowercase wire/storage form, e.g. `"javascript"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Go => "go",
        }
    }

    /// Human-facing label for the status bar and language selector.
    pub fn label(self) -> &'static str {
        match self {
            Language::Javascript => "JavaScript",
            Language::Typescript => "TypeScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Go => "Go",
        }
    }

    /// Returns the next language in selector order (wraps around).
    pub fn next(self) -> Self {
        match self {
            Language::Javascript => Language::Typescript,
            Language::Typescript => Language::Python,
            Language::Python => Language::Java,
            Language::Java => Language::Go,
            Language::Go => Language::Javascript,
        }
    }
}

/// Process-wide color scheme, persisted across sessions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
}

impl ThemeKind {
    /// Returns the other scheme — the theme-toggle intent.
    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Light => ThemeKind::Dark,
            ThemeKind::Dark => ThemeKind::Light,
        }
    }
}

/// An open, named, editable code buffer with a language tag.
///
/// `id` is an opaque unique string (UUID v4 text). The code field is replaced
/// wholesale on every edit; there is no incremental mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: String,
    pub name: String,
    pub language: Language,
    pub code: String,
}

/// Risk classification derived from a review score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Pure function of score, applied identically to backend and simulated
    /// results: 9–10 is Low, 7–8 is Moderate, everything below is High.
    pub fn from_score(score: u8) -> Self {
        if score >= 9 {
            RiskLevel::Low
        } else if score >= 7 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    /// Display string, e.g. `"Moderate Risk"`.
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

/// Numeric metrics attached to a review outcome.
///
/// Complexity and maintainability are only produced by the simulation engine;
/// the backend path reports neither, so both are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMetrics {
    pub cyclomatic_complexity: Option<u8>,
    pub maintainability_index: Option<u8>,
    pub bugs_detected: u8,
}

/// What a single review call produces, before risk derivation.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub feedback: String,
    pub score: u8,
    pub metrics: CodeMetrics,
}

/// The review outcome cached per file, invalidated whenever the file's code
/// is edited. Session-only — never persisted.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub feedback: String,
    pub score: u8,
    pub metrics: CodeMetrics,
    pub risk: RiskLevel,
}

impl AnalysisResult {
    /// Finalizes a review outcome by deriving its risk level.
    pub fn from_outcome(outcome: ReviewOutcome) -> Self {
        let risk = RiskLevel::from_score(outcome.score);
        Self {
            feedback: outcome.feedback,
            score: outcome.score,
            metrics: outcome.metrics,
            risk,
        }
    }
}

/// An immutable record of a past completed review.
///
/// Entries snapshot the file name and language at call time and survive the
/// file being closed. `timestamp` is a pre-formatted display string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub file_name: String,
    pub timestamp: String,
    pub language: Language,
    pub score: u8,
    pub risk: RiskLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_boundaries() {
        assert_eq!(RiskLevel::from_score(10), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(8), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(7), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(6), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::High);
    }

    #[test]
    fn language_round_trips_through_json() {
        let json = serde_json::to_string(&Language::Typescript).unwrap();
        assert_eq!(json, "\"typescript\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Language::Typescript);
    }

    #[test]
    fn language_cycle_covers_all_variants() {
        let mut seen = vec![Language::Javascript];
        let mut current = Language::Javascript;
        loop {
            current = current.next();
            if current == Language::Javascript {
                break;
            }
            seen.push(current);
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn theme_toggle_is_an_involution() {
        assert_eq!(ThemeKind::Light.toggled(), ThemeKind::Dark);
        assert_eq!(ThemeKind::Light.toggled().toggled(), ThemeKind::Light);
    }
}
