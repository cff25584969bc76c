use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use vismem_core::controller::GallerySnapshot;
use vismem_core::search::ALL_SORT_KEYS;
use vismem_core::suggest;

use super::event::{AsyncAction, AsyncResult};

/// Input mode within the gallery screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Filter,
    ConfirmDelete,
}

/// Central application state. The gallery itself lives in the worker;
/// the UI keeps the latest snapshot plus purely local input state.
pub struct App {
    pub snapshot: GallerySnapshot,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub busy: bool,

    pub selected: usize,

    // -- Search input --
    pub search_input: String,
    /// Character index into `search_input` (not a byte offset; queries
    /// may contain multibyte characters).
    pub search_cursor: usize,
    pub suggestions: Vec<String>,
    pub suggestion_selected: Option<usize>,

    // -- Filter editing --
    pub sort_index: usize, // index into ALL_SORT_KEYS
    pub min_confidence: f32,

    // -- Delete confirmation --
    pub pending_delete: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            snapshot: GallerySnapshot::default(),
            input_mode: InputMode::Normal,
            should_quit: false,
            busy: true,
            selected: 0,
            search_input: String::new(),
            search_cursor: 0,
            suggestions: Vec::new(),
            suggestion_selected: None,
            sort_index: 0,
            min_confidence: 0.0,
            pending_delete: None,
        }
    }

    /// Process an async result from the worker.
    pub fn handle_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::State(snapshot) => {
                self.snapshot = *snapshot;
                self.busy = self.snapshot.status.any_in_flight();
                let len = self.visible_count();
                if len == 0 {
                    self.selected = 0;
                } else if self.selected >= len {
                    self.selected = len - 1;
                }
            }
        }
    }

    /// Handle a key event. Returns an optional async action to dispatch.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal(key),
            InputMode::Search => self.handle_search(key),
            InputMode::Filter => self.handle_filter(key),
            InputMode::ConfirmDelete => self.handle_confirm_delete(key),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('G') => {
                let len = self.visible_count();
                if len > 0 {
                    self.selected = len - 1;
                }
                None
            }
            KeyCode::Char('g') => {
                self.selected = 0;
                None
            }
            KeyCode::PageDown => {
                self.move_selection(20);
                None
            }
            KeyCode::PageUp => {
                self.move_selection(-20);
                None
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.search_input = self.snapshot.query.clone();
                self.search_cursor = self.search_input.chars().count();
                self.recompute_suggestions();
                None
            }
            KeyCode::Char('f') => {
                self.input_mode = InputMode::Filter;
                self.sort_index = ALL_SORT_KEYS
                    .iter()
                    .position(|k| *k == self.snapshot.filters.sort_by)
                    .unwrap_or(0);
                self.min_confidence = self.snapshot.filters.min_confidence;
                None
            }
            KeyCode::Char('r') => {
                self.busy = true;
                Some(AsyncAction::Refresh)
            }
            KeyCode::Char('m') => {
                self.busy = true;
                Some(AsyncAction::Migrate)
            }
            KeyCode::Char('d') => {
                if let Some(filename) = self.selected_filename() {
                    self.pending_delete = Some(filename);
                    self.input_mode = InputMode::ConfirmDelete;
                }
                None
            }
            KeyCode::Esc => {
                if self.viewing_results() || !self.snapshot.query.is_empty() {
                    self.selected = 0;
                    Some(AsyncAction::ClearSearch)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn handle_search(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.suggestions.clear();
                self.suggestion_selected = None;
                None
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.suggestions.clear();
                self.suggestion_selected = None;
                if self.search_input.trim().is_empty() {
                    self.selected = 0;
                    Some(AsyncAction::ClearSearch)
                } else {
                    self.busy = true;
                    self.selected = 0;
                    Some(AsyncAction::Search {
                        query: self.search_input.clone(),
                    })
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                self.cycle_suggestion(1);
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.cycle_suggestion(-1);
                None
            }
            KeyCode::Backspace => {
                if self.search_cursor > 0 {
                    self.search_cursor -= 1;
                    self.search_input.remove(self.cursor_byte_offset());
                    self.recompute_suggestions();
                }
                None
            }
            KeyCode::Left => {
                if self.search_cursor > 0 {
                    self.search_cursor -= 1;
                }
                None
            }
            KeyCode::Right => {
                if self.search_cursor < self.search_input.chars().count() {
                    self.search_cursor += 1;
                }
                None
            }
            KeyCode::Char(c) => {
                self.search_input.insert(self.cursor_byte_offset(), c);
                self.search_cursor += 1;
                self.recompute_suggestions();
                None
            }
            _ => None,
        }
    }

    fn handle_filter(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('f') => {
                self.input_mode = InputMode::Normal;
                self.selected = 0;
                Some(AsyncAction::SetFilters {
                    min_confidence: self.min_confidence,
                    sort_by: ALL_SORT_KEYS[self.sort_index],
                })
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.sort_index = (self.sort_index + 1) % ALL_SORT_KEYS.len();
                None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if self.sort_index == 0 {
                    self.sort_index = ALL_SORT_KEYS.len() - 1;
                } else {
                    self.sort_index -= 1;
                }
                None
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.min_confidence = (self.min_confidence + 0.1).min(1.0);
                None
            }
            KeyCode::Char('-') => {
                self.min_confidence = (self.min_confidence - 0.1).max(0.0);
                None
            }
            _ => None,
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let filename = self.pending_delete.take()?;
                self.busy = true;
                Some(AsyncAction::Delete { filename })
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.pending_delete = None;
                None
            }
            _ => None,
        }
    }

    fn cycle_suggestion(&mut self, delta: i32) {
        if self.suggestions.is_empty() {
            return;
        }
        let len = self.suggestions.len() as i32;
        let next = match self.suggestion_selected {
            Some(i) => (i as i32 + delta).rem_euclid(len) as usize,
            None if delta >= 0 => 0,
            None => (len - 1) as usize,
        };
        self.suggestion_selected = Some(next);
        self.search_input = self.suggestions[next].clone();
        self.search_cursor = self.search_input.chars().count();
    }

    /// Byte offset of the character cursor within `search_input`; the
    /// end of the string when the cursor sits past the last character.
    fn cursor_byte_offset(&self) -> usize {
        self.search_input
            .char_indices()
            .nth(self.search_cursor)
            .map(|(offset, _)| offset)
            .unwrap_or(self.search_input.len())
    }

    fn recompute_suggestions(&mut self) {
        self.suggestions = suggest::suggestions_for(&self.search_input);
        self.suggestion_selected = None;
    }

    /// Whether the table is currently showing search results.
    pub fn viewing_results(&self) -> bool {
        !self.snapshot.results.is_empty()
    }

    /// How many rows are visible in the current table.
    pub fn visible_count(&self) -> usize {
        if self.viewing_results() {
            self.snapshot.results.len()
        } else {
            self.snapshot.screenshots.len()
        }
    }

    /// Filename of the currently selected row, if any.
    pub fn selected_filename(&self) -> Option<String> {
        if self.viewing_results() {
            self.snapshot
                .results
                .get(self.selected)
                .map(|r| r.filename().to_string())
        } else {
            self.snapshot
                .screenshots
                .get(self.selected)
                .map(|s| s.filename.clone())
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.visible_count();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let new = (self.selected as i32 + delta).clamp(0, len as i32 - 1);
        self.selected = new as usize;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use vismem_core::model::{Screenshot, SearchResult};
    use vismem_core::search::SortKey;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn shot(filename: &str) -> Screenshot {
        Screenshot {
            filename: filename.to_string(),
            upload_time: Utc::now(),
            text_content: None,
            image_data: None,
        }
    }

    fn populated_app(names: &[&str]) -> App {
        let mut app = App::new();
        app.busy = false;
        app.snapshot.screenshots = names.iter().map(|n| shot(n)).collect();
        app
    }

    #[test]
    fn test_initial_state() {
        let app = App::new();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
        assert!(app.busy);
        assert_eq!(app.visible_count(), 0);
    }

    #[test]
    fn test_quit() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = App::new();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_selection_navigation() {
        let mut app = populated_app(&["a.png", "b.png", "c.png"]);
        assert_eq!(app.selected, 0);
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected, 1);
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected, 2);
        // Clamped at the end
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected, 2);
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.selected, 1);
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.selected, 0);
        app.handle_key(key(KeyCode::Char('G')));
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_search_typing_updates_suggestions() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "login".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.search_input, "login");
        assert_eq!(app.suggestions, vec!["login form".to_string()]);
    }

    #[test]
    fn test_multibyte_query_editing() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('/')));
        for c in "éx".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.search_input, "éx");
        assert_eq!(app.search_cursor, 2);

        // Move left past the multibyte character and insert before it.
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.search_input, "aéx");

        // Backspace removes one character, not one byte.
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.search_input, "ax");
        assert_eq!(app.search_cursor, 1);

        let action = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            action,
            Some(AsyncAction::Search { ref query }) if query == "ax"
        ));
    }

    #[test]
    fn test_search_prefills_from_multibyte_query() {
        let mut app = App::new();
        app.busy = false;
        app.snapshot.query = "café".to_string();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.search_cursor, 4);
        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.search_input, "cafés");
    }

    #[test]
    fn test_suggestion_cycling_fills_input() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('/')));
        for c in "error".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert!(!app.suggestions.is_empty());
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.suggestion_selected, Some(0));
        assert_eq!(app.search_input, app.suggestions[0]);
    }

    #[test]
    fn test_search_submit_emits_action() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('/')));
        for c in "dashboard".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        let action = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            action,
            Some(AsyncAction::Search { ref query }) if query == "dashboard"
        ));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.busy);
    }

    #[test]
    fn test_empty_search_submit_clears() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('/')));
        let action = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(action, Some(AsyncAction::ClearSearch)));
    }

    #[test]
    fn test_filter_mode_emits_set_filters_on_exit() {
        let mut app = App::new();
        app.busy = false;
        app.handle_key(key(KeyCode::Char('f')));
        assert_eq!(app.input_mode, InputMode::Filter);
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char('+')));
        let action = app.handle_key(key(KeyCode::Esc));
        match action {
            Some(AsyncAction::SetFilters {
                min_confidence,
                sort_by,
            }) => {
                assert!((min_confidence - 0.1).abs() < 1e-6);
                assert_eq!(sort_by, SortKey::Date);
            }
            other => panic!("expected SetFilters, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = populated_app(&["a.png", "b.png"]);
        app.handle_key(key(KeyCode::Char('j')));
        let action = app.handle_key(key(KeyCode::Char('d')));
        assert!(action.is_none());
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        assert_eq!(app.pending_delete.as_deref(), Some("b.png"));

        let action = app.handle_key(key(KeyCode::Char('y')));
        assert!(matches!(
            action,
            Some(AsyncAction::Delete { ref filename }) if filename == "b.png"
        ));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_delete_cancel() {
        let mut app = populated_app(&["a.png"]);
        app.handle_key(key(KeyCode::Char('d')));
        let action = app.handle_key(key(KeyCode::Char('n')));
        assert!(action.is_none());
        assert!(app.pending_delete.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_delete_on_empty_gallery_is_noop() {
        let mut app = App::new();
        app.busy = false;
        let action = app.handle_key(key(KeyCode::Char('d')));
        assert!(action.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_snapshot_result_clamps_selection() {
        let mut app = populated_app(&["a.png", "b.png", "c.png"]);
        app.selected = 2;

        let mut snapshot = GallerySnapshot::default();
        snapshot.screenshots = vec![shot("a.png")];
        app.handle_result(AsyncResult::State(Box::new(snapshot)));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_results_take_over_navigation() {
        let mut app = populated_app(&["a.png", "b.png", "c.png"]);
        app.snapshot.results = vec![SearchResult {
            screenshot: shot("hit.png"),
            confidence_score: 0.9,
            visual_description: String::new(),
        }];
        assert!(app.viewing_results());
        assert_eq!(app.visible_count(), 1);
        assert_eq!(app.selected_filename().as_deref(), Some("hit.png"));
    }

    #[test]
    fn test_escape_clears_active_search() {
        let mut app = populated_app(&["a.png"]);
        app.snapshot.query = "login".to_string();
        let action = app.handle_key(key(KeyCode::Esc));
        assert!(matches!(action, Some(AsyncAction::ClearSearch)));
    }
}
