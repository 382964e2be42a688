use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::timestamp::naive_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// A solver's request to work on a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub project_id: i64,
    pub problem_solver_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver_name: Option<String>,
    pub status: ApplicationStatus,
    #[serde(with = "naive_datetime")]
    pub requested_at: PrimitiveDateTime,
    #[serde(default, with = "naive_datetime::option")]
    pub responded_at: Option<PrimitiveDateTime>,
}

/// Acknowledgement of an accept/reject decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDecision {
    pub message: String,
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub project_id: Option<i64>,
}
