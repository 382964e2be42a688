use crate::error::ClientResult;
use crate::models::SolverProfile;
use crate::services::ApiClient;

pub struct ProfilesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProfilesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn solver(&self, solver_id: i64) -> ClientResult<SolverProfile> {
        self.client
            .get_json(&format!("/profiles/solver/{}", solver_id))
            .await
    }
}
