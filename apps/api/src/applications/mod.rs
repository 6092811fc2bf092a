//! Job application tracking.
//!
//! Applications are created by the quick-apply flow and removed by withdraw;
//! accepted/rejected transitions are driven externally and never happen here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

pub mod handlers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: String,
    pub job_title: String,
    pub applicant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// A submission must carry a cover message or a resume (or both).
pub fn validate_submission(message: Option<&str>, has_resume: bool) -> Result<(), AppError> {
    let has_message = message.map(|m| !m.trim().is_empty()).unwrap_or(false);
    if !has_message && !has_resume {
        return Err(AppError::Validation(
            "Please add a cover message or attach your CV.".to_string(),
        ));
    }
    Ok(())
}

/// Status partition for the applications board.
#[derive(Debug, Default, Serialize)]
pub struct PartitionedApplications {
    pub pending: Vec<Application>,
    pub accepted: Vec<Application>,
    pub rejected: Vec<Application>,
}

pub fn partition(applications: &[Application]) -> PartitionedApplications {
    let mut out = PartitionedApplications::default();
    for app in applications {
        match app.status {
            ApplicationStatus::Pending => out.pending.push(app.clone()),
            ApplicationStatus::Accepted => out.accepted.push(app.clone()),
            ApplicationStatus::Rejected => out.rejected.push(app.clone()),
        }
    }
    out
}
