use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::timestamp::naive_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// Uploaded work artifact for a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub task_id: i64,
    pub problem_solver_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(with = "naive_datetime")]
    pub submitted_at: PrimitiveDateTime,
    #[serde(default, with = "naive_datetime::option")]
    pub reviewed_at: Option<PrimitiveDateTime>,
}

/// Review decision body, see `views::forms::SubmissionReview`
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSubmission {
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionActionResponse {
    pub message: String,
    #[serde(default)]
    pub submission: Option<Submission>,
}
