#![allow(dead_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    PeaceJob,
    Freelance,
    PartTime,
    FullTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub employer: String,
    #[serde(rename = "type")]
    pub kind: JobType,
    pub location: String,
    pub description: String,
    pub requirements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    pub posted_at: String,
    pub skills: Vec<String>,
    pub verified: bool,
    pub coordinates: Coordinates,
}

/// The seeded job board.
pub fn seed_jobs() -> Vec<Job> {
    vec![
        Job {
            id: "1".to_string(),
            title: "Assistant Gardener".to_string(),
            employer: "Green Spaces Ltd".to_string(),
            kind: JobType::PeaceJob,
            location: "Soweto, Johannesburg".to_string(),
            description:
                "Looking for an enthusiastic assistant for residential garden maintenance."
                    .to_string(),
            requirements: vec![
                "Punctual".to_string(),
                "Basic knowledge of plants".to_string(),
                "Hardworking".to_string(),
            ],
            salary_range: Some("R150 - R200 per day".to_string()),
            posted_at: "2 hours ago".to_string(),
            skills: vec!["Landscaping".to_string(), "Manual Labor".to_string()],
            verified: true,
            coordinates: Coordinates {
                lat: -26.2309,
                lng: 27.8584,
            },
        },
        Job {
            id: "2".to_string(),
            title: "Junior Web Developer".to_string(),
            employer: "TechSpark ZA".to_string(),
            kind: JobType::FullTime,
            location: "Sandton, Johannesburg".to_string(),
            description: "Entry-level React position for a motivated self-learner.".to_string(),
            requirements: vec![
                "React basics".to_string(),
                "HTML/CSS".to_string(),
                "Problem solving".to_string(),
            ],
            salary_range: Some("R15,000 - R20,000 pm".to_string()),
            posted_at: "1 day ago".to_string(),
            skills: vec![
                "React".to_string(),
                "JavaScript".to_string(),
                "Tailwind".to_string(),
            ],
            verified: true,
            coordinates: Coordinates {
                lat: -26.1076,
                lng: 28.0567,
            },
        },
    ]
}
