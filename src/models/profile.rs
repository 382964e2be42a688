use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::timestamp::naive_datetime;
use super::user::UserRole;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverStatistics {
    pub total_applications: i64,
    pub accepted_applications: i64,
    pub completed_projects: i64,
    pub active_projects: i64,
    pub acceptance_rate: f64,
}

/// Public profile of a problem solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverProfile {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(with = "naive_datetime")]
    pub created_at: PrimitiveDateTime,
    pub statistics: SolverStatistics,
}
