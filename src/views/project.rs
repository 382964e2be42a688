use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::models::{
    Application, ApplicationStatus, Payment, PaymentStatus, ProjectDetail, Submission,
    SubmissionStatus,
};
use crate::services::ApiClient;
use crate::views::section;

/// Counts shown on the tabs of the manage-project screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManageTabCounts {
    pub applications: usize,
    pub submissions: usize,
    pub payment_requests: usize,
}

/// Buyer's manage-project screen.
///
/// The project itself must load; the three sections load concurrently and a
/// failing section is left empty with its error kept in `section_errors`.
#[derive(Debug, Clone, Serialize)]
pub struct ManageProjectView {
    pub project: ProjectDetail,
    pub applications: Vec<Application>,
    pub submissions: Vec<Submission>,
    pub payment_requests: Vec<Payment>,
    pub section_errors: Vec<String>,
}

impl ManageProjectView {
    pub async fn load(client: &ApiClient, project_id: i64) -> ClientResult<Self> {
        let project = client.buyer().get_project(project_id).await.map_err(|e| match e {
            ClientError::NotFound(_) | ClientError::Forbidden(_) => ClientError::NotFound(
                "Project not found or you do not have access".to_string(),
            ),
            other => other,
        })?;

        let marketplace = client.marketplace();
        let submissions = client.submissions();
        let buyer = client.buyer();
        let (applications, subs, payments) = futures::join!(
            marketplace.project_applications(project_id),
            submissions.for_project(project_id),
            buyer.payment_requests(project_id),
        );

        let mut section_errors = Vec::new();
        let applications = section(applications, "applications", &mut section_errors)?;
        let submissions = section(subs, "submissions", &mut section_errors)?;
        let payment_requests = section(payments, "payment requests", &mut section_errors)?;

        Ok(Self {
            project,
            applications,
            submissions,
            payment_requests,
            section_errors,
        })
    }

    pub fn tab_counts(&self) -> ManageTabCounts {
        ManageTabCounts {
            applications: self.applications.len(),
            submissions: self.submissions.len(),
            payment_requests: self.payment_requests.len(),
        }
    }

    pub fn pending_applications(&self) -> impl Iterator<Item = &Application> {
        self.applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
    }

    pub fn submissions_to_review(&self) -> impl Iterator<Item = &Submission> {
        self.submissions
            .iter()
            .filter(|s| s.status == SubmissionStatus::Pending)
    }

    pub fn pending_payments(&self) -> impl Iterator<Item = &Payment> {
        self.payment_requests
            .iter()
            .filter(|p| p.status == PaymentStatus::Pending)
    }
}
