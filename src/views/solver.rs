use serde::Serialize;

use crate::error::ClientResult;
use crate::models::{Application, ApplicationStatus, AssignedProject, Project, Sprint, Task};
use crate::services::ApiClient;
use crate::views::section;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SolverStats {
    pub assigned_projects: usize,
    pub applications: usize,
    pub accepted: usize,
    pub pending: usize,
}

/// Solver dashboard: assigned projects plus the solver's applications
#[derive(Debug, Clone, Serialize)]
pub struct SolverDashboard {
    pub assigned: Vec<Project>,
    pub applications: Vec<Application>,
}

impl SolverDashboard {
    pub async fn load(client: &ApiClient) -> ClientResult<Self> {
        let marketplace = client.marketplace();
        let solver = client.solver();
        let (applications, assigned) =
            futures::try_join!(marketplace.my_applications(), solver.my_assignments())?;

        Ok(Self {
            assigned,
            applications,
        })
    }

    pub fn stats(&self) -> SolverStats {
        let with_status =
            |status: ApplicationStatus| self.applications.iter().filter(|a| a.status == status).count();

        SolverStats {
            assigned_projects: self.assigned.len(),
            applications: self.applications.len(),
            accepted: with_status(ApplicationStatus::Accepted),
            pending: with_status(ApplicationStatus::Pending),
        }
    }
}

/// Solver's view of one assigned project with its tasks and sprints
#[derive(Debug, Clone, Serialize)]
pub struct SolverProjectView {
    pub project: AssignedProject,
    pub tasks: Vec<Task>,
    pub sprints: Vec<Sprint>,
    pub section_errors: Vec<String>,
}

impl SolverProjectView {
    pub async fn load(client: &ApiClient, project_id: i64) -> ClientResult<Self> {
        let project = client.solver().assigned_project(project_id).await?;

        let solver = client.solver();
        let sprints = client.sprints();
        let (tasks, project_sprints) =
            futures::join!(solver.list_tasks(), sprints.for_project(project_id));

        let mut section_errors = Vec::new();
        let tasks = section(tasks, "tasks", &mut section_errors)?
            .into_iter()
            .filter(|t| t.project_id == project_id)
            .collect();
        let sprints = section(project_sprints, "sprints", &mut section_errors)?;

        Ok(Self {
            project,
            tasks,
            sprints,
            section_errors,
        })
    }

    /// Tasks that can still take a ZIP upload
    pub fn open_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.status.accepts_submission())
    }
}

/// All of the solver's tasks next to the projects they belong to
#[derive(Debug, Clone, Serialize)]
pub struct SolverTasksView {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
}

impl SolverTasksView {
    pub async fn load(client: &ApiClient) -> ClientResult<Self> {
        let solver = client.solver();
        let (tasks, projects) = futures::try_join!(solver.list_tasks(), solver.my_assignments())?;
        Ok(Self { tasks, projects })
    }

    pub fn project_title(&self, project_id: i64) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| p.id == project_id)
            .map(|p| p.title.as_str())
    }
}
