use crate::api::Page;
use crate::error::ClientResult;
use crate::models::{MessageResponse, RoleUpdate, User, UserRole};
use crate::services::ApiClient;

/// `/admin` endpoints (admin role only)
pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_users(&self, page: Page) -> ClientResult<Vec<User>> {
        self.client.get_json_query("/admin/users", &page).await
    }

    pub async fn get_user(&self, user_id: i64) -> ClientResult<User> {
        self.client
            .get_json(&format!("/admin/users/{}", user_id))
            .await
    }

    pub async fn assign_role(&self, user_id: i64, role: UserRole) -> ClientResult<User> {
        self.client
            .patch_json(&format!("/admin/users/{}/role", user_id), &RoleUpdate { role })
            .await
    }

    pub async fn activate_user(&self, user_id: i64) -> ClientResult<MessageResponse> {
        self.client
            .post_empty(&format!("/admin/users/{}/activate", user_id))
            .await
    }

    pub async fn deactivate_user(&self, user_id: i64) -> ClientResult<MessageResponse> {
        self.client
            .post_empty(&format!("/admin/users/{}/deactivate", user_id))
            .await
    }
}
