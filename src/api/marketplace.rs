use crate::error::ClientResult;
use crate::models::{
    Application, ApplicationDecision, CategoryList, MarketplaceProject, MarketplaceQuery,
};
use crate::services::ApiClient;

/// `/marketplace` endpoints: public browsing and the application workflow
pub struct MarketplaceApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MarketplaceApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn browse(&self, query: &MarketplaceQuery) -> ClientResult<Vec<MarketplaceProject>> {
        self.client
            .get_json_query("/marketplace/projects", query)
            .await
    }

    pub async fn project(&self, project_id: i64) -> ClientResult<MarketplaceProject> {
        self.client
            .get_json(&format!("/marketplace/projects/{}", project_id))
            .await
    }

    pub async fn categories(&self) -> ClientResult<CategoryList> {
        self.client.get_json("/marketplace/categories").await
    }

    pub async fn apply(&self, project_id: i64) -> ClientResult<Application> {
        self.client
            .post_empty(&format!("/marketplace/projects/{}/apply", project_id))
            .await
    }

    pub async fn my_applications(&self) -> ClientResult<Vec<Application>> {
        self.client.get_json("/marketplace/my-applications").await
    }

    /// Applications for one project, oldest first
    pub async fn project_applications(&self, project_id: i64) -> ClientResult<Vec<Application>> {
        self.client
            .get_json(&format!("/marketplace/projects/{}/applications", project_id))
            .await
    }

    pub async fn accept_application(&self, application_id: i64) -> ClientResult<ApplicationDecision> {
        self.client
            .post_empty(&format!("/marketplace/applications/{}/accept", application_id))
            .await
    }

    pub async fn reject_application(&self, application_id: i64) -> ClientResult<ApplicationDecision> {
        self.client
            .post_empty(&format!("/marketplace/applications/{}/reject", application_id))
            .await
    }
}
