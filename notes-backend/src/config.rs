use std::env;
use std::path::Path;

use crate::models::NotePolicy;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Hex color stored on notes created without one
    pub const DEFAULT_COLOR: &str = "NOTES_DEFAULT_COLOR";
    /// Set to "false" or "0" to accept notes with empty content.
    /// Default: true (title and content both required).
    pub const REQUIRE_CONTENT: &str = "NOTES_REQUIRE_CONTENT";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 5000;
    pub const BIND_ADDRESS: &str = "0.0.0.0";
    pub const DATABASE_URL: &str = "./.db/notes.db";
    pub const DEFAULT_COLOR: &str = notes_types::DEFAULT_NOTE_COLOR;
    pub const REQUIRE_CONTENT: bool = true;
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub database_url: String,
    pub default_color: String,
    pub require_content: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: defaults::PORT,
            bind_address: defaults::BIND_ADDRESS.to_string(),
            database_url: defaults::DATABASE_URL.to_string(),
            default_color: defaults::DEFAULT_COLOR.to_string(),
            require_content: defaults::REQUIRE_CONTENT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source, falling back to defaults
    /// for unset or unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup(env_vars::PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                log::warn!("Invalid {} value {:?} ({}), using {}", env_vars::PORT, raw, e, defaults::PORT);
                defaults::PORT
            }),
            None => defaults::PORT,
        };

        let require_content = match lookup(env_vars::REQUIRE_CONTENT) {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                log::warn!(
                    "Invalid {} value {:?}, using {}",
                    env_vars::REQUIRE_CONTENT,
                    raw,
                    defaults::REQUIRE_CONTENT
                );
                defaults::REQUIRE_CONTENT
            }),
            None => defaults::REQUIRE_CONTENT,
        };

        let default_color = lookup(env_vars::DEFAULT_COLOR)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| defaults::DEFAULT_COLOR.to_string());

        Self {
            port,
            bind_address: lookup(env_vars::BIND_ADDRESS)
                .unwrap_or_else(|| defaults::BIND_ADDRESS.to_string()),
            database_url: lookup(env_vars::DATABASE_URL)
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            default_color,
            require_content,
        }
    }

    /// Creation rules handed to the note store
    pub fn note_policy(&self) -> NotePolicy {
        NotePolicy {
            default_color: self.default_color.clone(),
            require_content: self.require_content,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Create the directory holding the SQLite file if it doesn't exist
pub fn ensure_database_dir(database_url: &str) -> std::io::Result<()> {
    if database_url == ":memory:" {
        return Ok(());
    }
    match Path::new(database_url).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
