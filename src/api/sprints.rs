use crate::error::ClientResult;
use crate::models::Sprint;
use crate::services::ApiClient;

pub struct SprintsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SprintsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn for_project(&self, project_id: i64) -> ClientResult<Vec<Sprint>> {
        self.client
            .get_json(&format!("/sprints/project/{}", project_id))
            .await
    }
}
