use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use super::submission::Submission;
use super::timestamp::{calendar_date, naive_datetime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Created,
    InProgress,
    Submitted,
    Accepted,
    Rejected,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Work can still be uploaded for this task
    pub fn accepts_submission(&self) -> bool {
        matches!(self, Self::Created | Self::InProgress | Self::Rejected)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub problem_solver_id: i64,
    pub title: String,
    pub description: String,
    #[serde(default, with = "calendar_date::option")]
    pub deadline: Option<Date>,
    pub status: TaskStatus,
    #[serde(with = "naive_datetime")]
    pub created_at: PrimitiveDateTime,
    #[serde(with = "naive_datetime")]
    pub updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    #[serde(with = "calendar_date::option", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Date>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "calendar_date::option", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Acknowledgement of an uploaded submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTaskResponse {
    pub message: String,
    pub submission_id: i64,
    pub file_name: String,
}
