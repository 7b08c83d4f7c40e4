//! Typed HTTP client for the notes API.

use async_trait::async_trait;
use notes_types::{CreateNoteRequest, DeletedResponse, ErrorResponse, Note, NotePatch};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a usable response
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Rejected locally before anything was sent
    #[error("{0}")]
    Invalid(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Operations the UI needs from the notes service
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Note>, ClientError>;
    async fn create(&self, req: &CreateNoteRequest) -> Result<Note, ClientError>;
    async fn update(&self, id: &str, patch: &NotePatch) -> Result<Note, ClientError>;
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

pub struct NotesClient {
    base_url: String,
    client: reqwest::Client,
}

impl NotesClient {
    /// `base_url` is the collection URL, e.g. `http://localhost:5000/api/notes`
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn note_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

/// Turn a non-success response into `ClientError::Api`, reading the
/// `{"error": ...}` body when there is one
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(api_error(status, &body))
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string());
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl NotesApi for NotesClient {
    async fn list(&self) -> Result<Vec<Note>, ClientError> {
        let resp = self.client.get(&self.base_url).send().await?;
        Ok(check(resp).await?.json::<Vec<Note>>().await?)
    }

    async fn create(&self, req: &CreateNoteRequest) -> Result<Note, ClientError> {
        let resp = self.client.post(&self.base_url).json(req).send().await?;
        Ok(check(resp).await?.json::<Note>().await?)
    }

    async fn update(&self, id: &str, patch: &NotePatch) -> Result<Note, ClientError> {
        let resp = self.client.patch(self.note_url(id)).json(patch).send().await?;
        Ok(check(resp).await?.json::<Note>().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let resp = self.client.delete(self.note_url(id)).send().await?;
        let confirmation = check(resp).await?.json::<DeletedResponse>().await?;
        log::debug!("Delete {}: {}", id, confirmation.message);
        Ok(())
    }
}
