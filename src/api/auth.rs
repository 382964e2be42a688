use crate::error::ClientResult;
use crate::models::{AuthToken, LoginRequest, RegisterRequest};
use crate::services::ApiClient;

/// `/auth` endpoints. Both return the same token shape.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthToken> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post_json("/auth/login", &body).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthToken> {
        self.client.post_json("/auth/register", request).await
    }
}
