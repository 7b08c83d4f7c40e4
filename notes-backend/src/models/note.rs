use notes_types::{CreateNoteRequest, DEFAULT_NOTE_COLOR};

use crate::error::NoteError;

/// Creation rules applied by the store
#[derive(Debug, Clone)]
pub struct NotePolicy {
    /// Color stored when the candidate has none
    pub default_color: String,
    /// Reject notes whose content is missing or blank
    pub require_content: bool,
}

impl Default for NotePolicy {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_NOTE_COLOR.to_string(),
            require_content: true,
        }
    }
}

impl NotePolicy {
    fn missing_fields_message(&self) -> &'static str {
        if self.require_content {
            "Title and content are required"
        } else {
            "Title is required"
        }
    }
}

/// Candidate record for an insert, before identity and timestamps exist
#[derive(Debug, Clone, Default)]
pub struct NewNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub pinned: Option<bool>,
}

impl From<CreateNoteRequest> for NewNote {
    fn from(req: CreateNoteRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            color: req.color,
            pinned: None,
        }
    }
}

/// A candidate that passed validation, with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidNote {
    pub title: String,
    pub content: String,
    pub color: String,
    pub pinned: bool,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).is_none_or(str::is_empty)
}

impl NewNote {
    pub(crate) fn validate(self, policy: &NotePolicy) -> Result<ValidNote, NoteError> {
        if is_blank(&self.title) || (policy.require_content && is_blank(&self.content)) {
            return Err(NoteError::Validation(policy.missing_fields_message().to_string()));
        }

        let color = self
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| policy.default_color.clone());

        Ok(ValidNote {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            color,
            pinned: self.pinned.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: Option<&str>, content: Option<&str>) -> NewNote {
        NewNote {
            title: title.map(String::from),
            content: content.map(String::from),
            ..NewNote::default()
        }
    }

    #[test]
    fn test_strict_policy_requires_title_and_content() {
        let policy = NotePolicy::default();

        for bad in [
            candidate(None, Some("body")),
            candidate(Some(""), Some("body")),
            candidate(Some("   "), Some("body")),
            candidate(Some("Title"), None),
            candidate(Some("Title"), Some("")),
        ] {
            match bad.validate(&policy) {
                Err(NoteError::Validation(msg)) => assert_eq!(msg, "Title and content are required"),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_relaxed_policy_allows_missing_content() {
        let policy = NotePolicy {
            require_content: false,
            ..NotePolicy::default()
        };

        let valid = candidate(Some("Title"), None).validate(&policy).unwrap();
        assert_eq!(valid.content, "");

        match candidate(Some(""), Some("body")).validate(&policy) {
            Err(NoteError::Validation(msg)) => assert_eq!(msg, "Title is required"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_applied() {
        let policy = NotePolicy {
            default_color: "#E6E6FA".to_string(),
            require_content: true,
        };
        let valid = candidate(Some("Groceries"), Some("milk, eggs")).validate(&policy).unwrap();
        assert_eq!(valid.color, "#E6E6FA");
        assert!(!valid.pinned);

        let mut with_color = candidate(Some("Groceries"), Some("milk"));
        with_color.color = Some("#C8E6C9".to_string());
        with_color.pinned = Some(true);
        let valid = with_color.validate(&policy).unwrap();
        assert_eq!(valid.color, "#C8E6C9");
        assert!(valid.pinned);
    }
}
