//! Error type shared by the note store and the HTTP layer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteError {
    /// A required field was missing or blank
    #[error("{0}")]
    Validation(String),

    /// The addressed note does not exist
    #[error("Note not found: {id}")]
    NotFound { id: String },

    /// The database could not complete the operation
    #[error("Store failure: {0}")]
    Store(#[from] rusqlite::Error),
}

impl NoteError {
    pub fn not_found(id: &str) -> Self {
        NoteError::NotFound { id: id.to_string() }
    }
}
