//! UI controller: every mutation goes to the server and is followed by a full
//! re-fetch, so the board only ever shows server-confirmed state.

use notes_types::{CreateNoteRequest, Note, NotePatch};

use crate::board::NoteBoard;
use crate::client::{ClientError, NotesApi};

pub struct App<A: NotesApi> {
    api: A,
    board: NoteBoard,
}

/// Fields to change on an existing note; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
}

fn require_text(value: &str, what: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::Invalid(format!("{} must not be empty", what)));
    }
    Ok(())
}

impl<A: NotesApi> App<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            board: NoteBoard::new(),
        }
    }

    pub fn board(&self) -> &NoteBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut NoteBoard {
        &mut self.board
    }

    /// Replace the board's list with the server's. On failure the board is
    /// left as it was.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.api.list().await {
            Ok(notes) => {
                self.board.replace_notes(notes);
                Ok(())
            }
            Err(e) => {
                log::error!("Error fetching notes: {}", e);
                Err(e)
            }
        }
    }

    pub async fn create(
        &mut self,
        title: &str,
        content: &str,
        color: Option<String>,
    ) -> Result<Note, ClientError> {
        require_text(title, "Title")?;
        require_text(content, "Content")?;

        let req = match color {
            Some(color) => CreateNoteRequest::new(title, content).with_color(color),
            None => CreateNoteRequest::new(title, content),
        };

        let note = self.api.create(&req).await.inspect_err(|e| {
            log::error!("Error adding note: {}", e);
        })?;
        self.after_mutation().await;
        self.board.back_to_grid();
        Ok(note)
    }

    pub async fn edit(&mut self, id: &str, edit: NoteEdit) -> Result<Note, ClientError> {
        let mut patch = NotePatch::default();
        if let Some(title) = edit.title {
            require_text(&title, "Title")?;
            patch = patch.title(title);
        }
        if let Some(content) = edit.content {
            require_text(&content, "Content")?;
            patch = patch.content(content);
        }
        if let Some(color) = edit.color {
            patch = patch.color(color);
        }
        if patch.is_empty() {
            return Err(ClientError::Invalid("Nothing to update".to_string()));
        }

        let note = self.api.update(id, &patch).await.inspect_err(|e| {
            log::error!("Error updating note: {}", e);
        })?;
        self.after_mutation().await;
        self.board.back_to_grid();
        Ok(note)
    }

    pub async fn set_pinned(&mut self, id: &str, pinned: bool) -> Result<Note, ClientError> {
        let note = self.api.update(id, &NotePatch::pin(pinned)).await.inspect_err(|e| {
            log::error!("Error pinning note: {}", e);
        })?;
        self.after_mutation().await;
        Ok(note)
    }

    /// Flip the pin flag of a note currently on the board
    pub async fn toggle_pin(&mut self, id: &str) -> Result<Note, ClientError> {
        let pinned = match self.board.find(id) {
            Some(note) => note.pinned,
            None => return Err(ClientError::Invalid(format!("Unknown note: {}", id))),
        };
        self.set_pinned(id, !pinned).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ClientError> {
        self.api.delete(id).await.inspect_err(|e| {
            log::error!("Error deleting note: {}", e);
        })?;
        self.after_mutation().await;
        Ok(())
    }

    // refresh already logs its own failure; the mutation itself succeeded
    async fn after_mutation(&mut self) {
        self.refresh().await.ok();
    }
}
