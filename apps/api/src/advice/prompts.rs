//! Prompt construction for the career coach.

use serde_json::{json, Value};

use crate::models::user::UserProfile;

const COACH_BRIEF: &str = "You are Sebenza AI, a helpful career assistant specifically for the \
    South African job market. Provide actionable, empathetic, and culturally relevant career \
    advice. Mention specific sectors (like the \"peace job\" economy, digital gigs, or formal \
    sectors) where relevant. Keep it encouraging and brief.";

pub fn career_advice_prompt(profile: &UserProfile, query: &str) -> String {
    let profile_json = serde_json::to_string(profile).unwrap_or_default();
    format!("User Profile: {profile_json}\nUser Question: {query}\n\n{COACH_BRIEF}")
}

pub fn match_score_prompt(job_description: &str, skills: &[String]) -> String {
    format!(
        "Job Description: {job_description}\nUser Skills: {}\nRate the match from 0 to 100.",
        skills.join(", ")
    )
}

/// Response schema declared to the backend for structured match-score output.
pub fn match_score_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "reasoning": { "type": "STRING" }
        },
        "required": ["score", "reasoning"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::seed_user;

    #[test]
    fn test_advice_prompt_carries_profile_and_query() {
        let prompt = career_advice_prompt(&seed_user(), "How do I find gigs?");
        assert!(prompt.contains("Zanele Dlamini"));
        assert!(prompt.contains("User Question: How do I find gigs?"));
        assert!(prompt.contains("Sebenza AI"));
    }

    #[test]
    fn test_match_prompt_joins_skills() {
        let prompt = match_score_prompt("Gardener needed", &["Gardening".into(), "Painting".into()]);
        assert!(prompt.contains("User Skills: Gardening, Painting"));
        assert!(prompt.contains("0 to 100"));
    }
}
