use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::api::Page;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AssignedProject, CreateTask, PaymentActionResponse, Project, ProjectActionResponse,
    SubmitTaskResponse, Task, TaskDetail, UpdateTask,
};
use crate::services::ApiClient;
use crate::views::forms::ensure_zip;

/// `/solver` endpoints: browsing, applying, tasks and work submission
pub struct SolverApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SolverApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Open projects only
    pub async fn browse_projects(&self, skip: u32, limit: u32) -> ClientResult<Vec<Project>> {
        self.client
            .get_json_query("/solver/projects", &Page { skip, limit })
            .await
    }

    pub async fn get_project(&self, project_id: i64) -> ClientResult<Project> {
        self.client
            .get_json(&format!("/solver/projects/{}", project_id))
            .await
    }

    /// Apply to work on a project
    pub async fn request_project(&self, project_id: i64) -> ClientResult<ProjectActionResponse> {
        self.client
            .post_empty(&format!("/solver/projects/{}/request", project_id))
            .await
    }

    /// Ask the buyer to release payment for an assigned project
    pub async fn request_completion(&self, project_id: i64) -> ClientResult<PaymentActionResponse> {
        self.client
            .post_empty(&format!("/solver/projects/{}/request-completion", project_id))
            .await
    }

    pub async fn my_assignments(&self) -> ClientResult<Vec<Project>> {
        self.client.get_json("/solver/my-assignments").await
    }

    pub async fn assigned_project(&self, project_id: i64) -> ClientResult<AssignedProject> {
        self.client
            .get_json(&format!("/solver/my-assignments/{}", project_id))
            .await
    }

    pub async fn create_task(&self, task: &CreateTask) -> ClientResult<Task> {
        self.client.post_json("/solver/tasks", task).await
    }

    pub async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        self.client.get_json("/solver/tasks").await
    }

    pub async fn get_task(&self, task_id: i64) -> ClientResult<TaskDetail> {
        self.client
            .get_json(&format!("/solver/tasks/{}", task_id))
            .await
    }

    pub async fn update_task(&self, task_id: i64, update: &UpdateTask) -> ClientResult<Task> {
        self.client
            .patch_json(&format!("/solver/tasks/{}", task_id), update)
            .await
    }

    /// Upload a ZIP archive from disk as the task's submission.
    /// The extension is checked before the file is read or anything is sent.
    pub async fn submit_task_file(
        &self,
        task_id: i64,
        path: &Path,
    ) -> ClientResult<SubmitTaskResponse> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ClientError::Validation("Please upload a ZIP file".to_string()))?
            .to_string();
        ensure_zip(&file_name)?;

        let bytes = tokio::fs::read(path).await?;
        self.submit_task(task_id, &file_name, bytes).await
    }

    /// Upload in-memory bytes as the task's submission
    pub async fn submit_task(
        &self,
        task_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<SubmitTaskResponse> {
        ensure_zip(file_name)?;

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/zip")?;
        let form = Form::new().part("file", part);

        self.client
            .post_multipart(&format!("/solver/tasks/{}/submit", task_id), form)
            .await
    }
}
