//! Workspace state manager.
//!
//! This module owns the mutable workspace model: the ordered collection of
//! open files, the active selection, the per-file analysis cache, and the
//! bounded review history. Every user action arrives as an explicit intent
//! method; each intent is a pure transition over this state with no I/O and
//! no rendering. The TUI binary reads the state when drawing and persists
//! the relevant slices after each mutating intent.
//!
//! # Invariants
//!
//! - The file collection is never empty. `new()` and `hydrate()` seed a
//!   starter file when needed, and [`WorkspaceState::close_file`] refuses to
//!   remove the sole remaining file.
//! - The active id always refers to an existing file. Closing the active
//!   file re-activates the last file of the remaining ordered sequence;
//!   hydration repairs a dangling persisted id to the first file.
//! - The history never exceeds [`HISTORY_LIMIT`] entries, newest first.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{AnalysisResult, HistoryEntry, Language, SourceFile};

/// Maximum number of review history entries retained (newest first).
pub const HISTORY_LIMIT: usize = 10;

/// Name of the file seeded into an empty workspace.
pub const STARTER_FILE_NAME: &str = "main.js";

/// Contents of the seeded starter file.
const STARTER_CODE: &str = "\
// Welcome to CodeSphere
// Start typing your code here...

function calculateTotal(items) {
  return items.reduce((acc, item) => acc + item.price, 0);
}";

/// Rejection reasons for structurally invalid workspace intents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    /// The workspace must always hold at least one open file.
    #[error("cannot close the last file")]
    LastFile,
    /// The intent referenced a file id that is not open.
    #[error("no open file with id {0}")]
    UnknownFile(String),
}

/// The workspace model mutated by intents and read by the renderer.
#[derive(Debug)]
pub struct WorkspaceState {
    files: Vec<SourceFile>,
    active_id: String,
    analyses: HashMap<String, AnalysisResult>,
    history: Vec<HistoryEntry>,
}

impl WorkspaceState {
    /// Creates a workspace holding only the seeded starter file.
    pub fn new() -> Self {
        let starter = SourceFile {
            id: uuid::Uuid::new_v4().to_string(),
            name: STARTER_FILE_NAME.to_owned(),
            language: Language::Javascript,
            code: STARTER_CODE.to_owned(),
        };
        let active_id = starter.id.clone();
        Self {
            files: vec![starter],
            active_id,
            analyses: HashMap::new(),
            history: Vec::new(),
        }
    }

    /// Rebuilds a workspace from the persisted slices.
    ///
    /// Repairs whatever a previous session (or a racing sibling instance)
    /// left inconsistent: an empty file collection falls back to the starter
    /// workspace, a dangling active id snaps to the first file, and an
    /// over-long history is truncated to [`HISTORY_LIMIT`].
    pub fn hydrate(
        files: Vec<SourceFile>,
        active_id: String,
        mut history: Vec<HistoryEntry>,
    ) -> Self {
        history.truncate(HISTORY_LIMIT);
        if files.is_empty() {
            let mut state = Self::new();
            state.history = history;
            return state;
        }
        let active_id = if files.iter().any(|f| f.id == active_id) {
            active_id
        } else {
            files[0].id.clone()
        };
        Self {
            files,
            active_id,
            analyses: HashMap::new(),
            history,
        }
    }

    /// The ordered collection of open files. Never empty.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Id of the active file.
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// The active file.
    ///
    /// Falls back to the first file if the active id ever dangles — the
    /// intents keep that from happening, but the renderer must never panic.
    pub fn active_file(&self) -> &SourceFile {
        self.files
            .iter()
            .find(|f| f.id == self.active_id)
            .unwrap_or(&self.files[0])
    }

    /// Replaces `file_id`'s code wholesale and drops its cached analysis.
    ///
    /// Any analysis result for the file is invalidated immediately so a
    /// stale score is never shown against edited code. Unknown ids are
    /// ignored (the presentation layer only dispatches ids it rendered).
    pub fn edit_code(&mut self, file_id: &str, new_code: String) {
        if let Some(file) = self.files.iter_mut().find(|f| f.id == file_id) {
            file.code = new_code;
            self.analyses.remove(file_id);
        }
    }

    /// Opens a new empty file and makes it active. Returns the new id.
    ///
    /// The generated name is `untitled-<count+1>.js` with the javascript
    /// default language, matching the new-tab affordance.
    pub fn create_file(&mut self) -> String {
        let file = SourceFile {
            id: uuid::Uuid::new_v4().to_string(),
            name: format!("untitled-{}.js", self.files.len() + 1),
            language: Language::Javascript,
            code: String::new(),
        };
        let id = file.id.clone();
        self.files.push(file);
        self.active_id = id.clone();
        id
    }

    /// Closes `file_id`.
    ///
    /// Refuses to close the sole remaining file ([`WorkspaceError::LastFile`],
    /// state unchanged — the caller surfaces the notification). When the
    /// active file is closed, the last file of the remaining ordered
    /// sequence becomes active (last-in-order policy, not nearest-neighbor).
    /// The file's cached analysis is dropped; history entries that mention
    /// the file survive untouched.
    pub fn close_file(&mut self, file_id: &str) -> Result<(), WorkspaceError> {
        if self.files.len() == 1 {
            return Err(WorkspaceError::LastFile);
        }
        if !self.files.iter().any(|f| f.id == file_id) {
            return Err(WorkspaceError::UnknownFile(file_id.to_owned()));
        }
        self.files.retain(|f| f.id != file_id);
        self.analyses.remove(file_id);
        if self.active_id == file_id {
            self.active_id = self.files[self.files.len() - 1].id.clone();
        }
        Ok(())
    }

    /// Replaces `file_id`'s language tag only. Idempotent; code and cached
    /// analysis are untouched.
    pub fn set_language(&mut self, file_id: &str, language: Language) {
        if let Some(file) = self.files.iter_mut().find(|f| f.id == file_id) {
            file.language = language;
        }
    }

    /// Switches the active selection. Unknown ids are ignored.
    pub fn set_active(&mut self, file_id: &str) {
        if self.files.iter().any(|f| f.id == file_id) {
            self.active_id = file_id.to_owned();
        }
    }

    /// Activates the next file in tab order (wraps around).
    pub fn activate_next(&mut self) {
        if let Some(pos) = self.files.iter().position(|f| f.id == self.active_id) {
            let next = (pos + 1) % self.files.len();
            self.active_id = self.files[next].id.clone();
        }
    }

    /// Activates the previous file in tab order (wraps around).
    pub fn activate_prev(&mut self) {
        if let Some(pos) = self.files.iter().position(|f| f.id == self.active_id) {
            let prev = (pos + self.files.len() - 1) % self.files.len();
            self.active_id = self.files[prev].id.clone();
        }
    }

    /// Merges a completed review against the id captured when the review was
    /// started — even if that file is no longer active, or no longer open.
    pub fn insert_analysis(&mut self, file_id: String, result: AnalysisResult) {
        self.analyses.insert(file_id, result);
    }

    /// Cached analysis for `file_id`, if one survived since the last edit.
    pub fn analysis_for(&self, file_id: &str) -> Option<&AnalysisResult> {
        self.analyses.get(file_id)
    }

    /// Cached analysis for the active file.
    pub fn active_analysis(&self) -> Option<&AnalysisResult> {
        self.analyses.get(self.active_id.as_str())
    }

    /// Prepends a history entry and truncates to [`HISTORY_LIMIT`].
    ///
    /// Existing entries are immutable snapshots; later reviews never touch
    /// them, they only push the oldest past the cap.
    pub fn record_review(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_LIMIT);
    }

    /// The review history, newest first, at most [`HISTORY_LIMIT`] entries.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CodeMetrics, RiskLevel};

    fn analysis(score: u8) -> AnalysisResult {
        AnalysisResult {
            feedback: "ok".to_owned(),
            score,
            metrics: CodeMetrics {
                cyclomatic_complexity: None,
                maintainability_index: None,
                bugs_detected: 0,
            },
            risk: RiskLevel::from_score(score),
        }
    }

    fn entry(file_name: &str, score: u8) -> HistoryEntry {
        HistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.to_owned(),
            timestamp: "12:00:00".to_owned(),
            language: Language::Javascript,
            score,
            risk: RiskLevel::from_score(score),
        }
    }

    #[test]
    fn starts_with_the_seeded_starter_file() {
        let ws = WorkspaceState::new();
        assert_eq!(ws.files().len(), 1);
        assert_eq!(ws.files()[0].name, STARTER_FILE_NAME);
        assert_eq!(ws.active_id(), ws.files()[0].id);
    }

    #[test]
    fn closing_the_sole_file_is_rejected_and_state_is_unchanged() {
        let mut ws = WorkspaceState::new();
        let id = ws.active_id().to_owned();
        assert_eq!(ws.close_file(&id), Err(WorkspaceError::LastFile));
        assert_eq!(ws.files().len(), 1);
        assert_eq!(ws.active_id(), id);
    }

    #[test]
    fn collection_never_empties_under_create_close_sequences() {
        let mut ws = WorkspaceState::new();
        ws.create_file();
        ws.create_file();
        let ids: Vec<String> = ws.files().iter().map(|f| f.id.clone()).collect();
        for id in &ids {
            let _ = ws.close_file(id);
            assert!(!ws.files().is_empty());
        }
        assert_eq!(ws.files().len(), 1);
    }

    #[test]
    fn create_file_twice_yields_three_files_and_active_follows_creation() {
        let mut ws = WorkspaceState::new();
        let first = ws.create_file();
        assert_eq!(ws.active_id(), first);
        let second = ws.create_file();
        assert_eq!(ws.active_id(), second);
        assert_eq!(ws.files().len(), 3);
        assert_ne!(first, second);
        assert_eq!(ws.files()[1].name, "untitled-2.js");
        assert_eq!(ws.files()[2].name, "untitled-3.js");
    }

    #[test]
    fn closing_the_active_of_two_activates_the_survivor() {
        let mut ws = WorkspaceState::new();
        let survivor = ws.active_id().to_owned();
        let doomed = ws.create_file();
        assert_eq!(ws.active_id(), doomed);
        ws.close_file(&doomed).unwrap();
        assert_eq!(ws.active_id(), survivor);
    }

    #[test]
    fn closing_a_background_file_keeps_the_active_selection() {
        let mut ws = WorkspaceState::new();
        let background = ws.active_id().to_owned();
        let active = ws.create_file();
        ws.close_file(&background).unwrap();
        assert_eq!(ws.active_id(), active);
    }

    #[test]
    fn closing_an_unknown_id_is_an_error() {
        let mut ws = WorkspaceState::new();
        ws.create_file();
        assert_eq!(
            ws.close_file("missing"),
            Err(WorkspaceError::UnknownFile("missing".to_owned()))
        );
        assert_eq!(ws.files().len(), 2);
    }

    #[test]
    fn edit_code_drops_the_cached_analysis_immediately() {
        let mut ws = WorkspaceState::new();
        let id = ws.active_id().to_owned();
        ws.insert_analysis(id.clone(), analysis(8));
        assert!(ws.analysis_for(&id).is_some());
        ws.edit_code(&id, "x = 1".to_owned());
        assert!(ws.analysis_for(&id).is_none());
        assert_eq!(ws.active_file().code, "x = 1");
    }

    #[test]
    fn edit_code_on_one_file_keeps_another_files_analysis() {
        let mut ws = WorkspaceState::new();
        let first = ws.active_id().to_owned();
        let second = ws.create_file();
        ws.insert_analysis(first.clone(), analysis(9));
        ws.edit_code(&second, "y = 2".to_owned());
        assert!(ws.analysis_for(&first).is_some());
    }

    #[test]
    fn set_language_is_idempotent() {
        let mut ws = WorkspaceState::new();
        let id = ws.active_id().to_owned();
        ws.set_language(&id, Language::Python);
        let once = ws.active_file().clone();
        ws.set_language(&id, Language::Python);
        let twice = ws.active_file();
        assert_eq!(once.language, twice.language);
        assert_eq!(once.code, twice.code);
        assert_eq!(once.name, twice.name);
    }

    #[test]
    fn history_is_capped_at_ten_newest_first() {
        let mut ws = WorkspaceState::new();
        for i in 0..12u8 {
            ws.record_review(entry(&format!("f{i}.js"), 7));
        }
        assert_eq!(ws.history().len(), HISTORY_LIMIT);
        assert_eq!(ws.history()[0].file_name, "f11.js");
        assert_eq!(ws.history()[9].file_name, "f2.js");
    }

    #[test]
    fn history_entries_survive_closing_their_file() {
        let mut ws = WorkspaceState::new();
        let doomed = ws.create_file();
        ws.record_review(entry("untitled-2.js", 8));
        ws.close_file(&doomed).unwrap();
        assert_eq!(ws.history().len(), 1);
        assert_eq!(ws.history()[0].file_name, "untitled-2.js");
    }

    #[test]
    fn later_reviews_do_not_mutate_earlier_entries() {
        let mut ws = WorkspaceState::new();
        ws.record_review(entry("a.js", 6));
        let frozen = ws.history()[0].clone();
        ws.record_review(entry("b.js", 9));
        assert_eq!(ws.history()[1].file_name, frozen.file_name);
        assert_eq!(ws.history()[1].score, frozen.score);
        assert_eq!(ws.history()[1].id, frozen.id);
    }

    #[test]
    fn analysis_can_land_on_a_closed_file_id() {
        // A review in flight is not cancelled by closing the tab; its result
        // is still merged against the id captured at call time.
        let mut ws = WorkspaceState::new();
        let doomed = ws.create_file();
        ws.close_file(&doomed).unwrap();
        ws.insert_analysis(doomed.clone(), analysis(7));
        assert!(ws.analysis_for(&doomed).is_some());
        assert!(ws.active_analysis().is_none());
    }

    #[test]
    fn tab_cycling_wraps_in_both_directions() {
        let mut ws = WorkspaceState::new();
        let first = ws.active_id().to_owned();
        let second = ws.create_file();
        let third = ws.create_file();
        ws.activate_next();
        assert_eq!(ws.active_id(), first);
        ws.activate_prev();
        assert_eq!(ws.active_id(), third);
        ws.activate_prev();
        assert_eq!(ws.active_id(), second);
    }

    #[test]
    fn hydrate_repairs_a_dangling_active_id() {
        let files = vec![
            SourceFile {
                id: "a".to_owned(),
                name: "a.js".to_owned(),
                language: Language::Javascript,
                code: String::new(),
            },
            SourceFile {
                id: "b".to_owned(),
                name: "b.js".to_owned(),
                language: Language::Go,
                code: String::new(),
            },
        ];
        let ws = WorkspaceState::hydrate(files, "gone".to_owned(), Vec::new());
        assert_eq!(ws.active_id(), "a");
    }

    #[test]
    fn hydrate_of_an_empty_collection_seeds_the_starter_file() {
        let history = vec![entry("old.js", 9)];
        let ws = WorkspaceState::hydrate(Vec::new(), String::new(), history);
        assert_eq!(ws.files().len(), 1);
        assert_eq!(ws.files()[0].name, STARTER_FILE_NAME);
        assert_eq!(ws.history().len(), 1);
    }

    #[test]
    fn hydrate_truncates_an_oversized_history() {
        let history: Vec<HistoryEntry> =
            (0..15u8).map(|i| entry(&format!("f{i}.js"), 7)).collect();
        let ws = WorkspaceState::hydrate(Vec::new(), String::new(), history);
        assert_eq!(ws.history().len(), HISTORY_LIMIT);
        assert_eq!(ws.history()[0].file_name, "f0.js");
    }
}
