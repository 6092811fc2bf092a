#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::money::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    JobSeeker,
    Employer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Free,
    Pro,
    Business,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub rating: f32,
    pub comment: String,
    pub date: String,
}

/// The session user, or a talent-directory profile.
/// `wallet_balance_cents` is debited only by completed withdrawals; pending
/// deposits never credit it (settlement is an external step).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub skills: Vec<String>,
    pub bio: String,
    pub location: String,
    pub certifications: Vec<String>,
    pub completed_gigs: u32,
    pub rating: f32,
    pub wallet_balance_cents: Cents,
    pub badges: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<u32>,
    pub subscription_tier: SubscriptionTier,
    pub favorites: Vec<String>,
    pub contacts: Vec<String>,
    pub reviews: Vec<Review>,
}

impl UserProfile {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// True when the profile's name or any skill contains the query
    /// (case-insensitive). Used by the contact/talent search box.
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.skills.iter().any(|s| s.to_lowercase().contains(&q))
    }
}

/// The seeded session user.
pub fn seed_user() -> UserProfile {
    UserProfile {
        id: "user_1".to_string(),
        name: "Zanele Dlamini".to_string(),
        role: UserRole::JobSeeker,
        skills: vec![
            "Marketing".to_string(),
            "Communication".to_string(),
            "Customer Service".to_string(),
        ],
        bio: "Passionate marketer looking to transition into digital advertising.".to_string(),
        location: "Johannesburg".to_string(),
        certifications: vec!["Diploma in Marketing (UJ)".to_string()],
        completed_gigs: 12,
        rating: 4.8,
        wallet_balance_cents: 125_000,
        badges: vec!["Early Adopter".to_string(), "Top Rated".to_string()],
        hourly_rate: None,
        subscription_tier: SubscriptionTier::Free,
        favorites: vec![],
        contacts: vec![],
        reviews: vec![],
    }
}

/// The seeded talent directory.
pub fn seed_talent() -> Vec<UserProfile> {
    vec![
        UserProfile {
            id: "t1".to_string(),
            name: "Thabo Molefe".to_string(),
            role: UserRole::JobSeeker,
            skills: vec![
                "Gardening".to_string(),
                "Painting".to_string(),
                "Handyman".to_string(),
            ],
            bio: "General laborer with 5 years of experience in township maintenance."
                .to_string(),
            location: "Soweto".to_string(),
            certifications: vec![],
            completed_gigs: 45,
            rating: 4.9,
            wallet_balance_cents: 0,
            badges: vec!["Top Rated".to_string(), "Verified".to_string()],
            hourly_rate: Some(85),
            subscription_tier: SubscriptionTier::Free,
            favorites: vec![],
            contacts: vec![],
            reviews: vec![Review {
                id: "r1".to_string(),
                reviewer_id: "e1".to_string(),
                reviewer_name: "Musa N.".to_string(),
                rating: 5.0,
                comment: "Punctual and very efficient gardener.".to_string(),
                date: "12 May".to_string(),
            }],
        },
        UserProfile {
            id: "t2".to_string(),
            name: "Lerato Kunene".to_string(),
            role: UserRole::JobSeeker,
            skills: vec!["Social Media".to_string(), "Content Creation".to_string()],
            bio: "Digital native helping small businesses grow their online presence."
                .to_string(),
            location: "Johannesburg CBD".to_string(),
            certifications: vec!["Google Digital Garage".to_string()],
            completed_gigs: 12,
            rating: 4.7,
            wallet_balance_cents: 0,
            badges: vec!["Skills Pro".to_string()],
            hourly_rate: Some(150),
            subscription_tier: SubscriptionTier::Free,
            favorites: vec![],
            contacts: vec![],
            reviews: vec![],
        },
        UserProfile {
            id: "t3".to_string(),
            name: "Mandla Zulu".to_string(),
            role: UserRole::JobSeeker,
            skills: vec!["Carpentry".to_string(), "Plumbing".to_string()],
            bio: "Experienced craftsman specialized in home repairs and bespoke furniture."
                .to_string(),
            location: "Pretoria East".to_string(),
            certifications: vec!["Red Seal Carpentry".to_string()],
            completed_gigs: 89,
            rating: 5.0,
            wallet_balance_cents: 0,
            badges: vec!["Expert".to_string()],
            hourly_rate: Some(220),
            subscription_tier: SubscriptionTier::Free,
            favorites: vec![],
            contacts: vec![],
            reviews: vec![],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name() {
        let user = seed_user();
        assert_eq!(user.first_name(), "Zanele");
    }

    #[test]
    fn test_search_matches_name_and_skills() {
        let talent = seed_talent();
        assert!(talent[0].matches_search("thabo"));
        assert!(talent[0].matches_search("garden"));
        assert!(!talent[0].matches_search("plumbing"));
        assert!(talent[2].matches_search("Plumbing"));
    }
}
