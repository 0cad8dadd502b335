//! Derived code statistics for the status bar.
//!
//! Recomputed on every code change, purely client-side and fully independent
//! of review results — no network, no randomness.

/// Size-based complexity tag shown next to the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeComplexity {
    Low,
    Medium,
    High,
}

impl CodeComplexity {
    pub fn label(self) -> &'static str {
        match self {
            CodeComplexity::Low => "Low",
            CodeComplexity::Medium => "Medium",
            CodeComplexity::High => "High",
        }
    }
}

/// Line, word, and estimated-token counts plus the complexity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeStats {
    pub lines: usize,
    pub words: usize,
    pub tokens: usize,
    pub complexity: CodeComplexity,
}

/// Measures `code`.
///
/// Tokens are estimated as `floor(words * 1.3)`. The complexity tag is
/// driven by line count alone: above 80 lines High, above 20 Medium,
/// otherwise Low.
pub fn measure(code: &str) -> CodeStats {
    let lines = if code.is_empty() { 0 } else { code.split('\n').count() };
    let words = code.split_whitespace().count();
    let tokens = (words as f64 * 1.3) as usize;
    let complexity = if lines > 80 {
        CodeComplexity::High
    } else if lines > 20 {
        CodeComplexity::Medium
    } else {
        CodeComplexity::Low
    };
    CodeStats { lines, words, tokens, complexity }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_measures_zero() {
        let stats = measure("");
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.tokens, 0);
        assert_eq!(stats.complexity, CodeComplexity::Low);
    }

    #[test]
    fn counts_lines_words_and_tokens() {
        let stats = measure("let x = 1;\nlet y = 2;");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.words, 8);
        // floor(8 * 1.3) = 10
        assert_eq!(stats.tokens, 10);
    }

    #[test]
    fn complexity_thresholds_sit_at_20_and_80_lines() {
        let code_of = |lines: usize| vec!["x"; lines].join("\n");
        assert_eq!(measure(&code_of(20)).complexity, CodeComplexity::Low);
        assert_eq!(measure(&code_of(21)).complexity, CodeComplexity::Medium);
        assert_eq!(measure(&code_of(80)).complexity, CodeComplexity::Medium);
        assert_eq!(measure(&code_of(81)).complexity, CodeComplexity::High);
    }

    #[test]
    fn whitespace_only_code_has_lines_but_no_words() {
        let stats = measure("  \n  ");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.words, 0);
    }
}
