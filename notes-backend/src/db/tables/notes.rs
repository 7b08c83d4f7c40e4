//! Note database operations

use chrono::{DateTime, Duration, Utc};
use notes_types::{Note, NotePatch};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};
use uuid::Uuid;

use crate::db::sqlite::{format_timestamp, now, parse_timestamp};
use crate::error::NoteError;
use crate::models::NewNote;
use super::super::Database;

const NOTE_COLUMNS: &str = "id, title, content, color, pinned, created_at, updated_at";

impl Database {
    /// Validate a candidate, assign identity and timestamps, and persist it
    pub fn insert_note(&self, candidate: NewNote) -> Result<Note, NoteError> {
        let valid = candidate.validate(self.policy())?;
        let conn = self.conn();

        // createdAt never runs backwards relative to earlier inserts
        let latest: Option<String> =
            conn.query_row("SELECT MAX(created_at) FROM notes", [], |row| row.get(0))?;
        let mut created_at = now();
        if let Some(raw) = latest {
            let latest = timestamp_column(0, &raw)?;
            if latest > created_at {
                created_at = latest;
            }
        }

        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: valid.title,
            content: valid.content,
            color: valid.color,
            pinned: valid.pinned,
            created_at,
            updated_at: created_at,
        };

        conn.execute(
            "INSERT INTO notes (id, title, content, color, pinned, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                note.id,
                note.title,
                note.content,
                note.color,
                note.pinned,
                format_timestamp(&note.created_at),
            ],
        )?;

        log::debug!("[NOTES] Created note {}", note.id);
        Ok(note)
    }

    /// All notes, newest first
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notes ORDER BY created_at DESC, seq DESC",
            NOTE_COLUMNS
        ))?;

        let notes = stmt
            .query_map([], row_to_note)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(notes)
    }

    /// Notes whose title or content contains `query`, newest first
    pub fn search_notes(&self, query: &str) -> Result<Vec<Note>, NoteError> {
        let notes = self.list_notes()?;
        Ok(notes.into_iter().filter(|n| n.matches(query)).collect())
    }

    pub fn get_note(&self, id: &str) -> Result<Note, NoteError> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {} FROM notes WHERE id = ?1", NOTE_COLUMNS),
            params![id],
            row_to_note,
        )
        .optional()?
        .ok_or_else(|| NoteError::not_found(id))
    }

    /// Apply the fields present in `patch` and refresh `updated_at`
    pub fn update_note(&self, id: &str, patch: &NotePatch) -> Result<Note, NoteError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        // unknown ids are NotFound before the patch itself is judged
        let existing = tx
            .query_row(
                &format!("SELECT {} FROM notes WHERE id = ?1", NOTE_COLUMNS),
                params![id],
                row_to_note,
            )
            .optional()?
            .ok_or_else(|| NoteError::not_found(id))?;

        if matches!(patch.title, Some(None)) {
            return Err(NoteError::Validation("Title cannot be null".to_string()));
        }
        if matches!(patch.content, Some(None)) {
            return Err(NoteError::Validation("Content cannot be null".to_string()));
        }

        let updated = apply_patch(existing, patch, &self.policy().default_color, now());

        tx.execute(
            "UPDATE notes SET title = ?1, content = ?2, color = ?3, pinned = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                updated.title,
                updated.content,
                updated.color,
                updated.pinned,
                format_timestamp(&updated.updated_at),
                id,
            ],
        )?;
        tx.commit()?;

        log::debug!("[NOTES] Updated note {}", id);
        Ok(updated)
    }

    /// Hard delete. A second delete of the same id is NotFound.
    pub fn delete_note(&self, id: &str) -> Result<(), NoteError> {
        let conn = self.conn();
        let rows_affected = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        if rows_affected == 0 {
            return Err(NoteError::not_found(id));
        }

        log::debug!("[NOTES] Deleted note {}", id);
        Ok(())
    }
}

fn row_to_note(row: &Row) -> SqliteResult<Note> {
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        color: row.get(3)?,
        pinned: row.get(4)?,
        created_at: timestamp_column(5, &created_at)?,
        updated_at: timestamp_column(6, &updated_at)?,
    })
}

fn timestamp_column(idx: usize, raw: &str) -> SqliteResult<DateTime<Utc>> {
    parse_timestamp(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn apply_patch(mut note: Note, patch: &NotePatch, default_color: &str, at: DateTime<Utc>) -> Note {
    if let Some(Some(title)) = &patch.title {
        note.title = title.clone();
    }
    if let Some(Some(content)) = &patch.content {
        note.content = content.clone();
    }
    match &patch.color {
        Some(Some(color)) => note.color = color.clone(),
        Some(None) => note.color = default_color.to_string(),
        None => {}
    }
    if let Some(pinned) = patch.pinned {
        note.pinned = pinned;
    }

    // strictly after the previous write, even within one clock tick
    note.updated_at = if at > note.updated_at {
        at
    } else {
        note.updated_at + Duration::microseconds(1)
    };
    note
}
