//! Terminal client for the notes service.
//!
//! Lists, searches, shows, creates, edits, pins and deletes notes over the
//! REST API. Each command loads the list first and re-fetches it after any
//! change, printing what the server confirmed.

mod app;
mod board;
mod client;

use clap::{Parser, Subcommand};
use notes_types::Note;

use app::{App, NoteEdit};
use board::{NoteBoard, ViewMode};
use client::{ClientError, NotesClient};

const DEFAULT_API_URL: &str = "http://localhost:5000/api/notes";

#[derive(Parser)]
#[clap(version, about = "Create, search, pin and delete notes from the terminal")]
struct Cli {
    /// Notes collection URL
    #[clap(long, env = "NOTES_API_URL", default_value = DEFAULT_API_URL)]
    server: String,

    /// Verbose output mode
    #[clap(short, long)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List notes, newest first
    List {
        /// Only show notes whose title or content contains this text
        #[clap(short, long)]
        search: Option<String>,
    },
    /// Show one note in full
    Show { id: String },
    /// Create a note
    Add {
        title: String,
        content: String,
        /// Hex color, e.g. "#E6E6FA"
        #[clap(long)]
        color: Option<String>,
    },
    /// Change a note's title, content or color
    Edit {
        id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        content: Option<String>,
        #[clap(long)]
        color: Option<String>,
    },
    /// Pin a note
    Pin { id: String },
    /// Unpin a note
    Unpin { id: String },
    /// Flip a note's pin
    Toggle { id: String },
    /// Delete a note
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let client = NotesClient::new(&cli.server);
    log::debug!("Using notes API at {}", client.base_url());

    let mut app = App::new(client);
    if let Err(e) = run(&mut app, cli.command).await {
        if e.is_not_found() {
            eprintln!("Error: note not found (it may have been deleted elsewhere)");
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(app: &mut App<NotesClient>, command: Command) -> Result<(), ClientError> {
    app.refresh().await?;

    match command {
        Command::List { search } => {
            if let Some(search) = search {
                app.board_mut().set_search(search);
            }
        }
        Command::Show { id } => {
            if !app.board_mut().open_note(&id) {
                return Err(ClientError::Invalid(format!("Unknown note: {}", id)));
            }
        }
        Command::Add { title, content, color } => {
            app.board_mut().open_create();
            let note = app.create(&title, &content, color).await?;
            println!("Created {}", note.id);
        }
        Command::Edit {
            id,
            title,
            content,
            color,
        } => {
            app.board_mut().open_edit(&id);
            let note = app.edit(&id, NoteEdit { title, content, color }).await?;
            println!("Updated {}", note.id);
        }
        Command::Pin { id } => {
            app.set_pinned(&id, true).await?;
        }
        Command::Unpin { id } => {
            app.set_pinned(&id, false).await?;
        }
        Command::Toggle { id } => {
            let note = app.toggle_pin(&id).await?;
            println!("{} {}", if note.pinned { "Pinned" } else { "Unpinned" }, note.id);
        }
        Command::Delete { id } => {
            app.delete(&id).await?;
            println!("Deleted {}", id);
        }
    }

    render(app.board());
    Ok(())
}

fn render(board: &NoteBoard) {
    match board.view() {
        ViewMode::Note(id) => {
            if let Some(note) = board.find(id) {
                print_full(note);
            }
        }
        ViewMode::Grid | ViewMode::Create | ViewMode::Edit(_) => print_grid(board),
    }
}

fn print_grid(board: &NoteBoard) {
    let visible = board.visible();
    if visible.is_empty() {
        if board.search().is_empty() {
            println!("No notes yet.");
        } else {
            println!("No notes match {:?}.", board.search());
        }
        return;
    }

    let shown = visible.len();
    for note in visible {
        let pin = if note.pinned { "*" } else { " " };
        println!(
            "{} {}  {}  {}  {}",
            pin,
            note.id,
            note.created_at.format("%Y-%m-%d %H:%M"),
            note.color,
            note.title
        );
        println!("    {}", preview(&note.content, 60));
    }
    println!("{} of {} notes", shown, board.notes().len());
}

fn print_full(note: &Note) {
    println!("{}{}", note.title, if note.pinned { "  (pinned)" } else { "" });
    println!("id {}  color {}", note.id, note.color);
    println!(
        "created {}  updated {}",
        note.created_at.format("%Y-%m-%d %H:%M:%S"),
        note.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!();
    println!("{}", note.content);
}

/// First line of `content`, cut to `max` characters
fn preview(content: &str, max: usize) -> String {
    let line = content.lines().next().unwrap_or("");
    if line.chars().count() <= max {
        return line.to_string();
    }
    let cut: String = line.chars().take(max).collect();
    format!("{}...", cut)
}
