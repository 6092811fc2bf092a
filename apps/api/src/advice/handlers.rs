use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::advice::{AssistantThread, MatchScore};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/assistant
pub async fn handle_get_assistant(State(state): State<AppState>) -> Json<AssistantThread> {
    Json(state.store.read(|s| s.assistant.clone()))
}

#[derive(Deserialize)]
pub struct AssistantMessageRequest {
    pub text: String,
}

/// POST /api/v1/assistant/messages
///
/// Single-flight per composer: a send while the previous one is still in
/// flight answers 409. The provider call runs in a spawned task so the busy
/// flag is released even when the client disconnects and the handler future
/// is dropped mid-request.
pub async fn handle_assistant_message(
    State(state): State<AppState>,
    Json(req): Json<AssistantMessageRequest>,
) -> Result<Json<AssistantThread>, AppError> {
    let (profile, query) = state.store.begin_assistant_send(&req.text)?;

    let store = state.store.clone();
    let advice = state.advice.clone();
    let reply = tokio::spawn(async move {
        let reply = advice.career_advice(&profile, &query).await;
        store.finish_assistant_send(reply);
    });
    reply
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("advice task failed: {e}")))?;

    Ok(Json(state.store.read(|s| s.assistant.clone())))
}

/// POST /api/v1/jobs/:id/match-score
///
/// `null` is the uniform "unavailable" answer: unknown jobs 404, but an
/// unconfigured or failing backend never errors.
pub async fn handle_match_score(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<MatchScore>>, AppError> {
    let (description, skills) = state.store.read(|s| {
        s.jobs
            .iter()
            .find(|j| j.id == id)
            .map(|j| (j.description.clone(), s.user.skills.clone()))
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
    })?;
    Ok(Json(state.advice.match_score(&description, &skills).await))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::advice::{AdviceProvider, AssistantRole};
    use crate::models::user::UserProfile;
    use crate::store::Store;

    /// Provider that takes a while, so a request can be dropped mid-flight.
    struct SlowAdvice;

    #[async_trait]
    impl AdviceProvider for SlowAdvice {
        async fn career_advice(&self, _profile: &UserProfile, _query: &str) -> String {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "Take a short course.".to_string()
        }

        async fn match_score(
            &self,
            _job_description: &str,
            _skills: &[String],
        ) -> Option<MatchScore> {
            None
        }
    }

    fn slow_state() -> AppState {
        AppState::new(Store::seeded(), Arc::new(SlowAdvice))
    }

    async fn drain_tasks() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_completes_and_releases_busy_flag() {
        let state = slow_state();
        let response = handle_assistant_message(
            State(state.clone()),
            Json(AssistantMessageRequest {
                text: "How do I upskill?".to_string(),
            }),
        )
        .await
        .unwrap();

        let thread = response.0;
        assert!(!thread.loading);
        assert_eq!(thread.messages.last().unwrap().role, AssistantRole::Ai);
        assert_eq!(thread.messages.last().unwrap().text, "Take a short course.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_request_still_releases_busy_flag() {
        let state = slow_state();

        let request_state = state.clone();
        let in_flight = tokio::spawn(async move {
            let _ = handle_assistant_message(
                State(request_state),
                Json(AssistantMessageRequest {
                    text: "How do I upskill?".to_string(),
                }),
            )
            .await;
        });
        drain_tasks().await;
        assert!(state.store.read(|s| s.assistant.loading));

        // client disconnect: the handler future is dropped mid-request
        in_flight.abort();
        tokio::time::advance(Duration::from_millis(60)).await;
        drain_tasks().await;

        state.store.read(|s| {
            assert!(!s.assistant.loading);
            assert_eq!(
                s.assistant.messages.last().unwrap().text,
                "Take a short course."
            );
        });
        assert!(state.store.begin_assistant_send("And then?").is_ok());
    }
}
