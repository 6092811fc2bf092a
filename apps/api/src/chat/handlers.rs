use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{ChatSession, Message, Reaction};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/chats
pub async fn handle_list_chats(State(state): State<AppState>) -> Json<Vec<ChatSession>> {
    Json(state.store.read(|s| s.chats.clone()))
}

#[derive(Deserialize)]
pub struct StartChatRequest {
    pub participant_id: String,
}

#[derive(Serialize)]
pub struct StartChatResponse {
    pub session: ChatSession,
    pub created: bool,
}

/// POST /api/v1/chats
///
/// Idempotent per participant: an existing session is returned with
/// `created: false` instead of opening a duplicate.
pub async fn handle_start_chat(
    State(state): State<AppState>,
    Json(req): Json<StartChatRequest>,
) -> Result<Json<StartChatResponse>, AppError> {
    let (session, created) = state.store.start_or_open_chat(&req.participant_id)?;
    Ok(Json(StartChatResponse { session, created }))
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// POST /api/v1/chats/:id/messages
///
/// Blank text is a no-op and answers `null`, mirroring the composer's
/// behavior of swallowing empty sends.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<Option<Message>>, AppError> {
    Ok(Json(state.store.send_message(id, &req.text)?))
}

/// POST /api/v1/chats/:id/attachments (multipart, one `file` part)
pub async fn handle_send_attachment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Message>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let mime = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        let message = state.store.attach_file(id, &name, &mime, bytes)?;
        return Ok(Json(message));
    }
    Err(AppError::Validation("Missing file part.".to_string()))
}

#[derive(Deserialize)]
pub struct ReactionRequest {
    pub emoji: String,
}

/// POST /api/v1/chats/:id/messages/:message_id/reactions
pub async fn handle_toggle_reaction(
    State(state): State<AppState>,
    Path((id, message_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ReactionRequest>,
) -> Result<Json<Vec<Reaction>>, AppError> {
    Ok(Json(state.store.toggle_reaction(id, message_id, &req.emoji)?))
}

/// GET /attachments/:id
///
/// Serves a stored upload with its recorded content type.
pub async fn handle_get_attachment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stored = state
        .store
        .attachment(id)
        .ok_or_else(|| AppError::NotFound(format!("Attachment {id} not found")))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, stored.mime_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", stored.name),
            ),
        ],
        stored.bytes,
    ))
}
