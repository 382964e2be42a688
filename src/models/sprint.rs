use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use super::timestamp::{calendar_date, naive_datetime};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: i64,
    pub project_id: i64,
    #[serde(default)]
    pub sprint_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String, // todo, in_progress, review, done
    pub priority: String, // low, medium, high, critical
    #[serde(default)]
    pub assigned_to_id: Option<i64>,
    #[serde(default)]
    pub estimated_hours: Option<i64>,
    #[serde(default)]
    pub order: i64,
}

/// Project phase with its features, read-only on the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "calendar_date::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "calendar_date::option")]
    pub end_date: Option<Date>,
    #[serde(default)]
    pub order: i64,
    #[serde(with = "naive_datetime")]
    pub created_at: PrimitiveDateTime,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Sprint {
    pub fn done_features(&self) -> usize {
        self.features.iter().filter(|f| f.status == "done").count()
    }
}
