use serde::Serialize;

use crate::api::Page;
use crate::error::ClientResult;
use crate::models::{
    Application, AssignSolver, CreateProject, MessageResponse, Payment, PaymentActionResponse,
    PaymentRejection, Project, ProjectActionResponse, ProjectDetail, UpdateProject,
};
use crate::services::ApiClient;
use crate::views::forms::RejectionReason;

#[derive(Serialize)]
struct RejectionQuery<'r> {
    rejection_reason: &'r str,
}

/// `/buyer` endpoints: project CRUD, assignment and payment review
pub struct BuyerApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BuyerApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_project(&self, project: &CreateProject) -> ClientResult<Project> {
        self.client.post_json("/buyer/projects", project).await
    }

    pub async fn list_projects(&self, skip: u32, limit: u32) -> ClientResult<Vec<Project>> {
        self.client
            .get_json_query("/buyer/projects", &Page { skip, limit })
            .await
    }

    pub async fn get_project(&self, project_id: i64) -> ClientResult<ProjectDetail> {
        self.client
            .get_json(&format!("/buyer/projects/{}", project_id))
            .await
    }

    pub async fn update_project(
        &self,
        project_id: i64,
        update: &UpdateProject,
    ) -> ClientResult<Project> {
        self.client
            .patch_json(&format!("/buyer/projects/{}", project_id), update)
            .await
    }

    pub async fn delete_project(&self, project_id: i64) -> ClientResult<MessageResponse> {
        self.client
            .delete_json(&format!("/buyer/projects/{}", project_id))
            .await
    }

    pub async fn project_requests(&self, project_id: i64) -> ClientResult<Vec<Application>> {
        self.client
            .get_json(&format!("/buyer/projects/{}/requests", project_id))
            .await
    }

    pub async fn assign_solver(
        &self,
        project_id: i64,
        problem_solver_id: i64,
    ) -> ClientResult<ProjectActionResponse> {
        self.client
            .post_json(
                &format!("/buyer/projects/{}/assign", project_id),
                &AssignSolver { problem_solver_id },
            )
            .await
    }

    pub async fn payment_requests(&self, project_id: i64) -> ClientResult<Vec<Payment>> {
        self.client
            .get_json(&format!("/buyer/projects/{}/payment-requests", project_id))
            .await
    }

    /// Release a pending payment; the backend also marks the project completed
    pub async fn approve_payment(&self, payment_id: i64) -> ClientResult<PaymentActionResponse> {
        self.client
            .post_empty(&format!("/buyer/payments/{}/approve", payment_id))
            .await
    }

    pub async fn reject_payment(
        &self,
        payment_id: i64,
        reason: &RejectionReason,
    ) -> ClientResult<PaymentRejection> {
        self.client
            .post_query(
                &format!("/buyer/payments/{}/reject", payment_id),
                &RejectionQuery {
                    rejection_reason: reason.as_str(),
                },
            )
            .await
    }
}
