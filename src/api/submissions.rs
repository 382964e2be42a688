use std::path::{Path, PathBuf};

use crate::error::ClientResult;
use crate::models::{Submission, SubmissionActionResponse};
use crate::services::ApiClient;
use crate::views::forms::SubmissionReview;

/// `/submissions` endpoints (buyer side)
pub struct SubmissionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SubmissionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn for_project(&self, project_id: i64) -> ClientResult<Vec<Submission>> {
        self.client
            .get_json(&format!("/submissions/projects/{}", project_id))
            .await
    }

    pub async fn get(&self, submission_id: i64) -> ClientResult<Submission> {
        self.client
            .get_json(&format!("/submissions/{}", submission_id))
            .await
    }

    /// Accept or reject. A rejection reason was already enforced when the
    /// review was built.
    pub async fn review(
        &self,
        submission_id: i64,
        review: &SubmissionReview,
    ) -> ClientResult<SubmissionActionResponse> {
        self.client
            .post_json(
                &format!("/submissions/{}/review", submission_id),
                &review.to_request(),
            )
            .await
    }

    pub async fn download(&self, submission_id: i64) -> ClientResult<Vec<u8>> {
        self.client
            .get_bytes(&format!("/submissions/{}/download", submission_id))
            .await
    }

    /// Download into `dir/<file_name>` and return the written path
    pub async fn download_to(
        &self,
        submission_id: i64,
        file_name: &str,
        dir: &Path,
    ) -> ClientResult<PathBuf> {
        let bytes = self.download(submission_id).await?;
        let safe_name = Path::new(file_name)
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| format!("submission_{}.zip", submission_id).into());
        let target = dir.join(safe_name);
        tokio::fs::write(&target, bytes).await?;
        Ok(target)
    }
}
