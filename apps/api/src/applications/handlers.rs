use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::applications::{partition, Application, PartitionedApplications};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Json<PartitionedApplications> {
    Json(state.store.read(|s| partition(&s.applications)))
}

/// POST /api/v1/applications (multipart)
///
/// Fields: `job_id` (required), `message` (optional cover text) and `resume`
/// (optional file part). At least one of message/resume must be present.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let mut job_id: Option<String> = None;
    let mut message: Option<String> = None;
    let mut resume: Option<(String, String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("job_id") => {
                job_id = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job_id: {e}"))
                })?);
            }
            Some("message") => {
                message = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read message: {e}"))
                })?);
            }
            Some("resume") => {
                let name = field.file_name().unwrap_or("resume").to_string();
                let mime = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read resume: {e}"))
                })?;
                resume = Some((name, mime, bytes));
            }
            _ => {}
        }
    }

    let job_id = job_id.ok_or_else(|| AppError::Validation("Missing job_id.".to_string()))?;
    let applicant_name = state.store.read(|s| s.user.name.clone());
    let application = state
        .store
        .submit_application(&job_id, &applicant_name, message, resume)?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_withdraw_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.withdraw_application(id)?;
    Ok(StatusCode::NO_CONTENT)
}
