mod note;

pub use note::{NewNote, NotePolicy};
