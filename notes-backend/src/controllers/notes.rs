//! Notes REST API: list, read, create, update (including pin/unpin) and delete.
//!
//! Every handler is a single store call; store outcomes map to status codes
//! and `{"error": ...}` bodies. Store failures are logged and answered with a
//! generic message.

use actix_web::{error::InternalError, web, HttpResponse, Responder};
use notes_types::{CreateNoteRequest, DeletedResponse, ErrorResponse, NotePatch};
use serde::Deserialize;

use crate::error::NoteError;
use crate::models::NewNote;
use crate::AppState;

fn error_response(err: NoteError, failure: &str) -> HttpResponse {
    match err {
        NoteError::Validation(msg) => HttpResponse::BadRequest().json(ErrorResponse::new(msg)),
        NoteError::NotFound { .. } => {
            HttpResponse::NotFound().json(ErrorResponse::new("Note not found"))
        }
        NoteError::Store(e) => {
            log::error!("[NOTES] {}: {}", failure, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(failure))
        }
    }
}

// --- List notes ---

#[derive(Debug, Deserialize)]
struct ListNotesQuery {
    /// Optional case-insensitive filter over title and content
    q: Option<String>,
}

async fn list_notes(
    data: web::Data<AppState>,
    query: web::Query<ListNotesQuery>,
) -> impl Responder {
    let result = match query.q.as_deref() {
        Some(q) => data.db.search_notes(q),
        None => data.db.list_notes(),
    };

    match result {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => error_response(e, "Failed to fetch notes"),
    }
}

// --- Read note ---

async fn get_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match data.db.get_note(&id) {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => error_response(e, "Failed to fetch note"),
    }
}

// --- Create note ---

async fn create_note(
    data: web::Data<AppState>,
    body: web::Json<CreateNoteRequest>,
) -> impl Responder {
    let candidate = NewNote::from(body.into_inner());

    match data.db.insert_note(candidate) {
        Ok(note) => {
            log::info!("[NOTES] Created note {} ({:?})", note.id, note.title);
            HttpResponse::Created().json(note)
        }
        Err(e) => error_response(e, "Failed to create note"),
    }
}

// --- Update note ---

async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NotePatch>,
) -> impl Responder {
    let id = path.into_inner();

    match data.db.update_note(&id, &body) {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => error_response(e, "Failed to update note"),
    }
}

// --- Delete note ---

async fn delete_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match data.db.delete_note(&id) {
        Ok(()) => {
            log::info!("[NOTES] Deleted note {}", id);
            HttpResponse::Ok().json(DeletedResponse::new())
        }
        Err(e) => error_response(e, "Failed to delete note"),
    }
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as everything else
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response =
            HttpResponse::BadRequest().json(ErrorResponse::new(format!("Invalid request body: {}", err)));
        InternalError::from_response(err, response).into()
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .app_data(json_config())
            .route("", web::get().to(list_notes))
            .route("", web::post().to(create_note))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::patch().to(update_note))
            .route("/{id}", web::delete().to(delete_note)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::Database;
    use actix_web::{http::StatusCode, test, App};
    use notes_types::Note;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    fn test_state(config: Config) -> (web::Data<AppState>, TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("notes.db");
        let db = Database::new(db_path.to_str().unwrap(), config.note_policy())
            .expect("Failed to open database");
        let state = web::Data::new(AppState {
            db: Arc::new(db),
            config,
            started_at: std::time::Instant::now(),
        });
        (state, dir)
    }

    #[actix_web::test]
    async fn test_groceries_lifecycle() {
        let (state, _dir) = test_state(Config::default());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        // create
        let req = test::TestRequest::post()
            .uri("/api/notes")
            .set_json(json!({ "title": "Groceries", "content": "milk, eggs" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Note = test::read_body_json(resp).await;
        assert!(!created.id.is_empty());
        assert!(!created.pinned);
        assert_eq!(created.color, "#FFF9C4");

        // list: appears first
        let req = test::TestRequest::get().uri("/api/notes").to_request();
        let listed: Vec<Note> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.first().map(|n| n.id.as_str()), Some(created.id.as_str()));

        // pin
        let req = test::TestRequest::patch()
            .uri(&format!("/api/notes/{}", created.id))
            .set_json(json!({ "pinned": true }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let pinned: Note = test::read_body_json(resp).await;
        assert!(pinned.pinned);
        assert_eq!(pinned.title, "Groceries");
        assert_eq!(pinned.content, "milk, eggs");
        assert!(pinned.updated_at > created.updated_at);

        // delete
        let req = test::TestRequest::delete()
            .uri(&format!("/api/notes/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Deleted" }));

        let req = test::TestRequest::get().uri("/api/notes").to_request();
        let listed: Vec<Note> = test::call_and_read_body_json(&app, req).await;
        assert!(listed.iter().all(|n| n.id != created.id));

        // delete again
        let req = test::TestRequest::delete()
            .uri(&format!("/api/notes/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Note not found" }));
    }

    #[actix_web::test]
    async fn test_create_requires_title_and_content() {
        let (state, _dir) = test_state(Config::default());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        for body in [
            json!({ "content": "no title" }),
            json!({ "title": "", "content": "empty title" }),
            json!({ "title": "no content" }),
        ] {
            let req = test::TestRequest::post().uri("/api/notes").set_json(body).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Title and content are required");
        }

        assert!(state.db.list_notes().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_relaxed_policy_accepts_missing_content() {
        let relaxed = Config {
            require_content: false,
            default_color: "#E6E6FA".to_string(),
            ..Config::default()
        };
        let (state, _dir) = test_state(relaxed);
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .set_json(json!({ "title": "Title only" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let note: Note = test::read_body_json(resp).await;
        assert_eq!(note.content, "");
        assert_eq!(note.color, "#E6E6FA");

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .set_json(json!({ "content": "body only" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Title is required");
    }

    #[actix_web::test]
    async fn test_list_order_and_search() {
        let (state, _dir) = test_state(Config::default());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let mut ids = Vec::new();
        for (title, content) in [("A", "apples"), ("B", "bread"), ("C", "more apples")] {
            let req = test::TestRequest::post()
                .uri("/api/notes")
                .set_json(json!({ "title": title, "content": content }))
                .to_request();
            let note: Note = test::call_and_read_body_json(&app, req).await;
            ids.push(note.id);
        }

        let req = test::TestRequest::get().uri("/api/notes").to_request();
        let listed: Vec<Note> = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<&str> = listed.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);

        let req = test::TestRequest::get().uri("/api/notes?q=APPLES").to_request();
        let found: Vec<Note> = test::call_and_read_body_json(&app, req).await;
        let found_ids: Vec<&str> = found.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(found_ids, vec![ids[2].as_str(), ids[0].as_str()]);
    }

    #[actix_web::test]
    async fn test_get_and_patch_unknown_id() {
        let (state, _dir) = test_state(Config::default());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/notes/does-not-exist").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::patch()
            .uri("/api/notes/does-not-exist")
            .set_json(json!({ "title": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::patch()
            .uri("/api/notes/does-not-exist")
            .set_json(json!({ "title": null }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Note not found" }));
    }

    #[actix_web::test]
    async fn test_store_failure_is_generic_500() {
        let (state, _dir) = test_state(Config::default());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .set_json(json!({ "title": "Before", "content": "the break" }))
            .to_request();
        let note: Note = test::call_and_read_body_json(&app, req).await;

        state.db.conn().execute_batch("DROP TABLE notes").unwrap();

        let requests = [
            (test::TestRequest::get().uri("/api/notes"), "Failed to fetch notes"),
            (
                test::TestRequest::post()
                    .uri("/api/notes")
                    .set_json(json!({ "title": "After", "content": "the break" })),
                "Failed to create note",
            ),
            (
                test::TestRequest::patch()
                    .uri(&format!("/api/notes/{}", note.id))
                    .set_json(json!({ "pinned": true })),
                "Failed to update note",
            ),
            (
                test::TestRequest::delete().uri(&format!("/api/notes/{}", note.id)),
                "Failed to delete note",
            ),
        ];

        for (req, message) in requests {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = test::read_body(resp).await;
            let text = std::str::from_utf8(&body).unwrap();
            assert_eq!(text, json!({ "error": message }).to_string());
            assert!(!text.contains("no such table"));
        }
    }

    #[actix_web::test]
    async fn test_patch_title_keeps_pin_and_ignores_server_fields() {
        let (state, _dir) = test_state(Config::default());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .set_json(json!({ "title": "Old", "content": "body", "color": "#C8E6C9" }))
            .to_request();
        let note: Note = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/notes/{}", note.id))
            .set_json(json!({ "pinned": true }))
            .to_request();
        let _: Note = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/notes/{}", note.id))
            .set_json(json!({ "title": "New", "id": "hijack", "createdAt": "2000-01-01T00:00:00Z" }))
            .to_request();
        let updated: Note = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "New");
        assert_eq!(updated.color, "#C8E6C9");
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.pinned);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_json_error() {
        let (state, _dir) = test_state(Config::default());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }
}
