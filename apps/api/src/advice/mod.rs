//! AI career-coach proxy.
//!
//! ARCHITECTURAL RULE: no other module calls the Gemini API directly; all
//! generative calls go through [`AdviceProvider`]. The trait soft-fails by
//! contract — callers receive fallback strings or `None`, never an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::user::UserProfile;

pub mod gemini;
pub mod handlers;
pub mod prompts;

/// Reply when no credential is configured (no network call is attempted).
pub const UNCONFIGURED_REPLY: &str = "API Key not configured. AI features are unavailable.";
/// Reply when the remote returns empty text.
pub const EMPTY_REPLY: &str = "I couldn't generate a response. Please try again.";
/// Reply when the remote call fails.
pub const OFFLINE_REPLY: &str =
    "Sorry, I'm having trouble connecting to the Sebenza network right now.";

/// Structured job-match verdict. `None` at the trait surface is the uniform
/// "unavailable" signal for this operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// 0–100.
    pub score: f64,
    pub reasoning: String,
}

/// Narrow capability interface over the text-generation backend. Carried in
/// `AppState` as `Arc<dyn AdviceProvider>`; the remote Gemini client is one
/// implementation, [`StaticAdvice`] the deterministic test double.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    /// Free-text career advice. Never fails: degraded paths return one of the
    /// fixed fallback strings above.
    async fn career_advice(&self, profile: &UserProfile, query: &str) -> String;

    /// Structured match score for a job description against the user's
    /// skills, or `None` when the backend is unavailable or errors.
    async fn match_score(&self, job_description: &str, skills: &[String]) -> Option<MatchScore>;
}

/// Deterministic provider for tests and offline demos.
#[allow(dead_code)]
pub struct StaticAdvice {
    pub reply: String,
    pub score: Option<MatchScore>,
}

#[async_trait]
impl AdviceProvider for StaticAdvice {
    async fn career_advice(&self, _profile: &UserProfile, _query: &str) -> String {
        self.reply.clone()
    }

    async fn match_score(&self, _job_description: &str, _skills: &[String]) -> Option<MatchScore> {
        self.score.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantRole {
    Ai,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: AssistantRole,
    pub text: String,
}

/// The coach widget's thread: greeting-seeded message log plus the busy flag
/// that holds sends to one outstanding request per composer.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantThread {
    pub messages: Vec<AssistantMessage>,
    pub loading: bool,
}

impl AssistantThread {
    pub fn greet(user: &UserProfile) -> Self {
        AssistantThread {
            messages: vec![AssistantMessage {
                role: AssistantRole::Ai,
                text: format!(
                    "Sawubona {}! 🇿🇦 I'm your Sebenza Career Coach. How can I assist you today?",
                    user.first_name()
                ),
            }],
            loading: false,
        }
    }

    pub fn push(&mut self, role: AssistantRole, text: impl Into<String>) {
        self.messages.push(AssistantMessage {
            role,
            text: text.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::seed_user;

    #[tokio::test]
    async fn test_static_advice_double() {
        let provider = StaticAdvice {
            reply: "Keep going!".to_string(),
            score: Some(MatchScore {
                score: 80.0,
                reasoning: "Strong overlap".to_string(),
            }),
        };
        let user = seed_user();
        assert_eq!(provider.career_advice(&user, "hi").await, "Keep going!");
        let score = provider.match_score("JD", &[]).await.unwrap();
        assert_eq!(score.score, 80.0);
    }

    #[test]
    fn test_greeting_uses_first_name() {
        let thread = AssistantThread::greet(&seed_user());
        assert_eq!(thread.messages.len(), 1);
        assert!(thread.messages[0].text.starts_with("Sawubona Zanele!"));
        assert!(!thread.loading);
    }
}
