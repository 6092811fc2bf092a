//! Marketplace browse surfaces plus the session-level endpoints
//! (notifications, reset) that do not belong to one feature module.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::Job;
use crate::models::user::UserProfile;
use crate::notifications::AppNotification;
use crate::state::AppState;

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.store.read(|s| s.jobs.clone()))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    state.store.read(|s| {
        s.jobs
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .map(Json)
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
    })
}

#[derive(Deserialize)]
pub struct TalentQuery {
    pub search: Option<String>,
}

/// GET /api/v1/talent?search=
pub async fn handle_list_talent(
    State(state): State<AppState>,
    Query(params): Query<TalentQuery>,
) -> Json<Vec<UserProfile>> {
    let query = params.search.unwrap_or_default();
    let query = query.trim();
    Json(state.store.read(|s| {
        s.talent
            .iter()
            .filter(|t| query.is_empty() || t.matches_search(query))
            .cloned()
            .collect()
    }))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<UserProfile> {
    Json(state.store.read(|s| s.user.clone()))
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub active: bool,
}

/// POST /api/v1/talent/:id/favorite
pub async fn handle_toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ToggleResponse> {
    Json(ToggleResponse {
        active: state.store.toggle_favorite(&id),
    })
}

/// POST /api/v1/talent/:id/contact
pub async fn handle_toggle_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ToggleResponse> {
    Json(ToggleResponse {
        active: state.store.toggle_contact(&id),
    })
}

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub items: Vec<AppNotification>,
    pub toasts: Vec<AppNotification>,
    pub unread_count: usize,
}

/// GET /api/v1/notifications
pub async fn handle_get_notifications(State(state): State<AppState>) -> Json<NotificationsResponse> {
    state.store.read(|s| {
        Json(NotificationsResponse {
            items: s.inbox.items().to_vec(),
            toasts: s.inbox.active_toasts(),
            unread_count: s.inbox.unread_count(),
        })
    })
}

/// POST /api/v1/notifications/read
pub async fn handle_mark_notifications_read(State(state): State<AppState>) -> StatusCode {
    state.store.mark_all_read();
    StatusCode::NO_CONTENT
}

/// POST /api/v1/session/reset
///
/// Returns the session to its seeded state; pending settlement timers are
/// aborted and stored uploads released.
pub async fn handle_reset_session(State(state): State<AppState>) -> StatusCode {
    state.store.reset();
    StatusCode::NO_CONTENT
}
