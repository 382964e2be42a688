use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ClientResult;
use crate::models::{Project, ProjectStatus};
use crate::services::ApiClient;

/// Tabs of the buyer dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerTab {
    #[default]
    Open,
    InProgress,
    Completed,
}

impl BuyerTab {
    pub const ALL: [BuyerTab; 3] = [Self::Open, Self::InProgress, Self::Completed];

    /// Cancelled projects belong to no tab
    pub fn contains(&self, status: ProjectStatus) -> bool {
        match self {
            Self::Open => status == ProjectStatus::Open,
            Self::InProgress => status.is_active(),
            Self::Completed => status == ProjectStatus::Completed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open Projects",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for BuyerTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BuyerTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!("Unknown tab: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TabCounts {
    pub open: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl TabCounts {
    pub fn from_projects(projects: &[Project]) -> Self {
        let count = |tab: BuyerTab| projects.iter().filter(|p| tab.contains(p.status)).count();
        Self {
            open: count(BuyerTab::Open),
            in_progress: count(BuyerTab::InProgress),
            completed: count(BuyerTab::Completed),
        }
    }

    pub fn get(&self, tab: BuyerTab) -> usize {
        match tab {
            BuyerTab::Open => self.open,
            BuyerTab::InProgress => self.in_progress,
            BuyerTab::Completed => self.completed,
        }
    }
}

/// Projects shown under `tab`, in server order
pub fn projects_in_tab(projects: &[Project], tab: BuyerTab) -> Vec<&Project> {
    projects.iter().filter(|p| tab.contains(p.status)).collect()
}

/// Fetch the buyer's own projects for the dashboard
pub async fn load_projects(client: &ApiClient) -> ClientResult<Vec<Project>> {
    client.buyer().list_projects(0, 100).await
}
