//! View state for the notes UI: the last fetched list, the search text and
//! which screen is showing.

use notes_types::Note;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    Note(String),
    Create,
    Edit(String),
}

#[derive(Debug, Clone)]
pub struct NoteBoard {
    notes: Vec<Note>,
    search: String,
    view: ViewMode,
}

impl Default for NoteBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteBoard {
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            search: String::new(),
            view: ViewMode::Grid,
        }
    }

    /// Swap in a freshly fetched list. A note view whose note is gone falls
    /// back to the grid.
    pub fn replace_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        let stale = match &self.view {
            ViewMode::Note(id) | ViewMode::Edit(id) => self.find(id).is_none(),
            ViewMode::Grid | ViewMode::Create => false,
        };
        if stale {
            self.view = ViewMode::Grid;
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn find(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Notes matching the search text, newest first
    pub fn visible(&self) -> Vec<&Note> {
        let mut visible: Vec<&Note> = self.notes.iter().filter(|n| n.matches(&self.search)).collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        visible
    }

    pub fn view(&self) -> &ViewMode {
        &self.view
    }

    pub fn open_note(&mut self, id: &str) -> bool {
        self.open(id, ViewMode::Note)
    }

    pub fn open_edit(&mut self, id: &str) -> bool {
        self.open(id, ViewMode::Edit)
    }

    pub fn open_create(&mut self) {
        self.view = ViewMode::Create;
    }

    pub fn back_to_grid(&mut self) {
        self.view = ViewMode::Grid;
    }

    fn open(&mut self, id: &str, mode: fn(String) -> ViewMode) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.view = mode(id.to_string());
        true
    }
}
