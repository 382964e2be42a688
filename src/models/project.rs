use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::application::Application;
use super::task::Task;
use super::timestamp::naive_datetime;

/// Project status as reported by the server; the client never advances it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Open,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Assigned or in progress: a solver is working on it
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCategory {
    WebDevelopment,
    MobileApp,
    DataScience,
    AiMl,
    Blockchain,
    Devops,
    Design,
    Content,
    #[default]
    #[serde(other)]
    Other,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 9] = [
        Self::WebDevelopment,
        Self::MobileApp,
        Self::DataScience,
        Self::AiMl,
        Self::Blockchain,
        Self::Devops,
        Self::Design,
        Self::Content,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebDevelopment => "web_development",
            Self::MobileApp => "mobile_app",
            Self::DataScience => "data_science",
            Self::AiMl => "ai_ml",
            Self::Blockchain => "blockchain",
            Self::Devops => "devops",
            Self::Design => "design",
            Self::Content => "content",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: ProjectCategory,
    pub budget: Decimal,
    pub status: ProjectStatus,
    pub buyer_id: i64,
    #[serde(default)]
    pub assigned_solver_id: Option<i64>,
    #[serde(with = "naive_datetime")]
    pub created_at: PrimitiveDateTime,
    #[serde(with = "naive_datetime")]
    pub updated_at: PrimitiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_applications: Option<i64>,
}

/// Buyer view of a single project with its requests and tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub requests: Vec<Application>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Marketplace listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceProject {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub applications_count: i64,
}

/// Solver view of a project assigned to them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedProject {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub buyer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub budget: Decimal,
    pub category: ProjectCategory,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
}

impl UpdateProject {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.budget.is_none()
            && self.category.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignSolver {
    pub problem_solver_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectActionResponse {
    pub message: String,
    #[serde(default)]
    pub project: Option<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketplaceSort {
    #[default]
    CreatedAt,
    Budget,
    Title,
}

impl FromStr for MarketplaceSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" | "newest" => Ok(Self::CreatedAt),
            "budget" => Ok(Self::Budget),
            "title" => Ok(Self::Title),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Query string for the marketplace listing
#[derive(Debug, Clone, Serialize)]
pub struct MarketplaceQuery {
    pub skip: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub sort_by: MarketplaceSort,
}

impl Default for MarketplaceQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 20,
            category: None,
            search: None,
            sort_by: MarketplaceSort::CreatedAt,
        }
    }
}
